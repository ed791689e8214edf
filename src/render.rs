//! HTML fragments for every view of the site.
//!
//! Renderers are pure: they read state and return markup. Attaching the
//! markup to a page is the host's job. All user-supplied text is escaped.

use crate::models::{Bucket, ItemStatus, Library, LibraryItem, Review, Score, Section};
use crate::notifications::{DismissTiming, Notification};

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

/// Escape text for use in element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `score` filled stars followed by empty ones up to five
pub fn stars(score: Score) -> String {
    let filled = score.get() as usize;
    let mut out = String::new();
    out.extend(std::iter::repeat(FILLED_STAR).take(filled));
    out.extend(std::iter::repeat(EMPTY_STAR).take(Score::MAX as usize - filled));
    out
}

/// First `max_chars` characters of `text`, with `...` when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn review_key(review: &Review) -> &str {
    review.id.as_deref().unwrap_or_default()
}

/// Community block for one section, placed after the section's card grid.
/// `None` when the section has no reviews.
pub fn community_section(section: Section, reviews: &[&Review], preview_chars: usize) -> Option<String> {
    if reviews.is_empty() {
        return None;
    }

    let mut html = String::new();
    html.push_str(&format!(
        "<div class=\"comunidad-section\" data-section=\"{}\">\n",
        section
    ));
    html.push_str("  <h3>✍️ Reseñas de la Comunidad</h3>\n");
    html.push_str("  <div class=\"cards-grid comunidad-grid\">\n");

    for review in reviews {
        html.push_str(&community_card(review, preview_chars));
    }

    html.push_str("  </div>\n</div>\n");
    Some(html)
}

fn community_card(review: &Review, preview_chars: usize) -> String {
    let key = escape(review_key(review));
    format!(
        r#"    <article class="card">
      <div class="card-image">
        <img src="{image}" alt="{name}">
        <span class="card-category">{category}</span>
      </div>
      <div class="card-content">
        <h3>{name}</h3>
        <div class="rating">
          <span class="stars">{stars}</span>
          <span class="rating-number">{score}/5</span>
        </div>
        <p class="card-description">{preview}</p>
        <div class="card-stats">
          <span>👤 {author}</span>
          <span>📅 {date}</span>
        </div>
        <div class="card-actions">
          <button class="btn btn-primary" data-action="view-review" data-id="{key}">Ver Reseña</button>
          <button class="btn btn-danger" data-action="delete-review" data-id="{key}">🗑️</button>
        </div>
      </div>
    </article>
"#,
        image = escape(&review.image_url),
        name = escape(&review.name),
        category = escape(&review.category),
        stars = stars(review.score),
        score = review.score.get(),
        preview = escape(&preview(&review.body, preview_chars)),
        author = escape(&review.author),
        date = escape(&review.date),
        key = key,
    )
}

/// Modal title and body for a single review
pub fn review_detail(review: &Review) -> (String, String) {
    let title = format!("📝 {}", review.name);
    let body = format!(
        r#"<div class="review-detail">
  <img src="{image}" alt="{name}">
  <div><span class="badge">{category}</span></div>
  <div class="rating">
    <span class="stars">{stars}</span>
    <span class="rating-number">{score}/5</span>
  </div>
  <p>{body}</p>
  <div class="review-footer">
    <span>👤 {author}</span>
    <span>📅 {date}</span>
  </div>
</div>
"#,
        image = escape(&review.image_url),
        name = escape(&review.name),
        category = escape(&review.category),
        stars = stars(review.score),
        score = review.score.get(),
        body = escape(&review.body),
        author = escape(&review.author),
        date = escape(&review.date),
    );
    (title, body)
}

/// Modal title and body listing every review of one title
pub fn title_reviews(title: &str, reviews: &[&Review]) -> (String, String) {
    let heading = format!("Reseñas de {}", title);

    if reviews.is_empty() {
        let body = "<p class=\"empty\">Aún no hay reseñas para este título. ¡Sé el primero en opinar!</p>\n"
            .to_string();
        return (heading, body);
    }

    let mut body = String::new();
    for review in reviews {
        body.push_str(&format!(
            r#"<div class="review-item">
  <div class="review-item-header">
    <strong>{author}</strong>
    <span class="stars">{stars}</span>
  </div>
  <p>{body}</p>
  <small>{date} • {likes} me gusta</small>
</div>
"#,
            author = escape(&review.author),
            stars = stars(review.score),
            body = escape(&review.body),
            date = escape(&review.date),
            likes = review.likes,
        ));
    }

    (heading, body)
}

fn library_row(bucket: Bucket, item: &LibraryItem) -> String {
    let hours = item
        .hours_played
        .map(|h| format!("\n      <br><small class=\"hours\">⏱️ {} horas</small>", h))
        .unwrap_or_default();

    format!(
        r#"  <div class="library-item">
    <div class="library-item-info">
      <strong>{name}</strong>
      <br>
      <small>Agregado: {date}</small>{hours}
    </div>
    <div class="library-item-actions">
      <span class="status" title="{status_label}">{glyph}</span>
      <button data-action="edit-item" data-bucket="{bucket}" data-id="{id}">✏️ Editar</button>
      <button data-action="delete-item" data-bucket="{bucket}" data-id="{id}">🗑️ Eliminar</button>
    </div>
  </div>
"#,
        name = escape(&item.name),
        date = escape(&item.date_added),
        hours = hours,
        status_label = item.status.label(),
        glyph = item.status.glyph(),
        bucket = bucket,
        id = item.id,
    )
}

/// Full library listing, all four buckets with counts
pub fn library_view(library: &Library) -> String {
    let mut html = String::from("<div class=\"library\">\n");

    for bucket in Bucket::ALL {
        let items = library.bucket(bucket);
        html.push_str(&format!(
            "<div class=\"library-bucket\" data-bucket=\"{}\">\n  <h3>{} ({})</h3>\n",
            bucket,
            bucket.title(),
            items.len()
        ));

        if items.is_empty() {
            html.push_str("  <p class=\"empty\">No tienes ningún item en esta categoría.</p>\n");
        } else {
            for item in items {
                html.push_str(&library_row(bucket, item));
            }
        }

        html.push_str("</div>\n");
    }

    html.push_str("</div>\n");
    html
}

/// Stat cards with the item count of each bucket
pub fn library_stats(library: &Library) -> String {
    let mut html = String::from("<div class=\"library-stats\">\n");
    for (bucket, count) in library.counts() {
        html.push_str(&format!(
            "  <div class=\"stat-card\" data-bucket=\"{}\"><span class=\"stat-number\">{}</span><span class=\"stat-label\">{}</span></div>\n",
            bucket,
            count,
            bucket.title()
        ));
    }
    html.push_str("</div>\n");
    html
}

fn status_options(selected: Option<ItemStatus>) -> String {
    ItemStatus::ALL
        .iter()
        .map(|status| {
            let marker = if Some(*status) == selected { " selected" } else { "" };
            format!(
                "      <option value=\"{}\"{}>{}</option>\n",
                status,
                marker,
                status.label()
            )
        })
        .collect()
}

/// Add-to-library form; the hours field is visible only for videogames
pub fn library_add_form(bucket: Bucket) -> String {
    let buckets: String = Bucket::ALL
        .iter()
        .map(|b| {
            let marker = if *b == bucket { " selected" } else { "" };
            format!("      <option value=\"{}\"{}>{}</option>\n", b, marker, b.singular())
        })
        .collect();
    let hours_style = if bucket.tracks_hours() { "block" } else { "none" };

    format!(
        r#"<form id="form-agregar-biblioteca">
  <label>Tipo de contenido:
    <select name="bucket">
{buckets}    </select>
  </label>
  <label>Nombre:
    <input type="text" name="name" placeholder="Ej: The Witcher 3" required>
  </label>
  <div class="hours-field" style="display: {hours_style};">
    <label>Horas jugadas:
      <input type="number" name="hours" placeholder="Ej: 50" min="0">
    </label>
  </div>
  <label>Estado:
    <select name="status">
{statuses}    </select>
  </label>
  <button type="submit">Agregar a Biblioteca</button>
</form>
"#,
        buckets = buckets,
        hours_style = hours_style,
        statuses = status_options(None),
    )
}

/// Edit form pre-filled from the item
pub fn library_edit_form(bucket: Bucket, item: &LibraryItem) -> String {
    let hours = if bucket.tracks_hours() {
        format!(
            r#"  <label>Horas jugadas:
    <input type="number" name="hours" value="{}" placeholder="Ej: 50" min="0">
  </label>
"#,
            item.hours_played.map(|h| h.to_string()).unwrap_or_default()
        )
    } else {
        String::new()
    };

    format!(
        r#"<form id="form-editar-biblioteca" data-bucket="{bucket}" data-id="{id}">
  <label>Nombre:
    <input type="text" name="name" value="{name}" required>
  </label>
{hours}  <label>Estado:
    <select name="status">
{statuses}    </select>
  </label>
  <button type="button" data-action="cancel">Cancelar</button>
  <button type="submit">Guardar Cambios</button>
</form>
"#,
        bucket = bucket,
        id = item.id,
        name = escape(&item.name),
        hours = hours,
        statuses = status_options(Some(item.status)),
    )
}

/// Toast markup; the host removes it after `timing.lifetime()`
pub fn notification(notification: &Notification, timing: &DismissTiming) -> String {
    format!(
        "<div class=\"notification\" style=\"background: {};\" data-visible-ms=\"{}\" data-exit-ms=\"{}\">{}</div>\n",
        notification.severity.color(),
        timing.visible.as_millis(),
        timing.exit.as_millis(),
        escape(&notification.text())
    )
}
