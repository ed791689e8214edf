use tracing::debug;

use crate::render::escape;

/// Content shown in the shared overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: String,
    /// Pre-rendered HTML body
    pub body: String,
}

/// Where a click inside the overlay landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalTarget {
    Backdrop,
    CloseControl,
    Content,
}

/// The single overlay region; opening replaces whatever was shown
#[derive(Debug, Default)]
pub struct ModalHost {
    current: Option<Modal>,
}

impl ModalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, title: impl Into<String>, body: impl Into<String>) {
        let modal = Modal {
            title: title.into(),
            body: body.into(),
        };
        debug!(title = %modal.title, replaced = self.current.is_some(), "Opening modal");
        self.current = Some(modal);
    }

    pub fn close(&mut self) {
        if self.current.take().is_some() {
            debug!("Modal closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Modal> {
        self.current.as_ref()
    }

    /// Dismiss on backdrop or close control; clicks on the content are ignored.
    /// Returns whether the modal was closed.
    pub fn click(&mut self, target: ModalTarget) -> bool {
        match target {
            ModalTarget::Backdrop | ModalTarget::CloseControl if self.is_open() => {
                self.close();
                true
            }
            _ => false,
        }
    }

    /// Overlay markup, or `None` when nothing is open
    pub fn render(&self) -> Option<String> {
        self.current.as_ref().map(|modal| {
            format!(
                r#"<div id="modal-overlay" class="modal-overlay" data-dismiss="backdrop">
  <div class="modal-dialog">
    <div class="modal-header">
      <h2>{}</h2>
      <button class="modal-close" data-dismiss="close">×</button>
    </div>
    <div class="modal-body">
{}
    </div>
  </div>
</div>
"#,
                escape(&modal.title),
                modal.body
            )
        })
    }
}
