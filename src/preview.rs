use tracing::{debug, warn};

use crate::artifact::Artifact;
use crate::common::error::{QRError, QRResult};

// Preview
//------------------------------------------------------------------------------

/// Identifies one render request; later requests compare greater.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct RequestId(u64);

/// Result of handing a finished render to the preview.
#[derive(Debug)]
pub enum PreviewUpdate {
    Displayed,
    /// A newer request was issued meanwhile; the result was dropped.
    Stale,
    /// The render failed; the previously displayed artifact is kept.
    Failed(QRError),
}

/// Tracks the artifact on display while renders complete out of order.
#[derive(Debug, Default)]
pub struct Preview {
    issued: u64,
    displayed: Option<(RequestId, Artifact)>,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the id for a new render, superseding every earlier one.
    pub fn begin(&mut self) -> RequestId {
        self.issued += 1;
        RequestId(self.issued)
    }

    pub fn latest(&self) -> Option<RequestId> {
        (self.issued > 0).then_some(RequestId(self.issued))
    }

    pub fn complete(&mut self, id: RequestId, result: QRResult<Artifact>) -> PreviewUpdate {
        let older = self.displayed.as_ref().is_some_and(|(shown, _)| id <= *shown);
        if id.0 != self.issued || older {
            warn!("Discarding stale render {:?}, latest is {}", id, self.issued);
            return PreviewUpdate::Stale;
        }

        match result {
            Ok(artifact) => {
                debug!("Displaying render {:?}", id);
                self.displayed = Some((id, artifact));
                PreviewUpdate::Displayed
            }
            Err(err) => {
                warn!("Render {:?} failed: {err}", id);
                PreviewUpdate::Failed(err)
            }
        }
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.displayed.as_ref().map(|(_, a)| a)
    }

    pub fn displayed_id(&self) -> Option<RequestId> {
        self.displayed.as_ref().map(|(id, _)| *id)
    }
}
