use serde::Deserialize;

/// Incremental decoder for a chunked completion response.
///
/// Chunks arrive as byte buffers framed as line-delimited `data: `
/// records. Feed each chunk as it arrives; the returned fragments are the
/// incremental text deltas in order. Once the `[DONE]` sentinel is seen
/// the decoder stays terminal: nothing from the rest of that chunk or
/// any later chunk is emitted.
///
/// Decoding is tolerant: lines without the `data: ` prefix (blank
/// separators, comments) are dropped outright, and a `data: ` line whose
/// payload fails extraction is skipped while the stream continues. Skips
/// are counted so callers can surface the diagnostic.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    done: bool,
    skipped_lines: u64,
}

#[derive(Debug, Deserialize)]
struct StreamEvent {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

impl StreamDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one transport chunk into zero or more text fragments.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done {
            return Vec::new();
        }

        let text = String::from_utf8_lossy(chunk);
        let mut fragments = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };

            if payload == DONE_SENTINEL {
                self.done = true;
                break;
            }

            match Self::extract_fragment(payload) {
                Some(fragment) => {
                    if !fragment.is_empty() {
                        fragments.push(fragment);
                    }
                }
                None => {
                    self.skipped_lines += 1;
                    tracing::debug!(payload, "skipping undecodable stream event");
                }
            }
        }

        fragments
    }

    /// Whether the `[DONE]` sentinel has been observed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of `data: ` lines dropped by the tolerance policy.
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    fn extract_fragment(payload: &str) -> Option<String> {
        let event: StreamEvent = serde_json::from_str(payload).ok()?;
        event
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
    }
}
