//! Single-pass scan of a raw eye-tracker log.
//!
//! The log mixes record kinds line by line. The scanner finds the column-header
//! declaration that opens the data segment and the `ScreenSize` /
//! `ViewingDistance` metadata declarations, and stops as soon as all three have
//! been seen.

use crate::error::{Error, Result};
use crate::models::{Sidecar, HEADER_CODE, METADATA_CODE, SCREEN_SIZE, VIEWING_DISTANCE};
use log::debug;

const DELIMITER: char = '\t';

/// Artifacts the scan still has to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending(u8);

impl Pending {
    const HEADER: u8 = 0b001;
    const SCREEN_SIZE: u8 = 0b010;
    const VIEWING_DISTANCE: u8 = 0b100;

    fn all() -> Self {
        Pending(Self::HEADER | Self::SCREEN_SIZE | Self::VIEWING_DISTANCE)
    }

    fn resolve(&mut self, artifact: u8) {
        self.0 &= !artifact;
    }

    fn is_done(&self) -> bool {
        self.0 == 0
    }

    fn missing(&self) -> Vec<&'static str> {
        [
            (Self::HEADER, "header"),
            (Self::SCREEN_SIZE, SCREEN_SIZE),
            (Self::VIEWING_DISTANCE, VIEWING_DISTANCE),
        ]
        .into_iter()
        .filter(|(bit, _)| self.0 & bit != 0)
        .map(|(_, name)| name)
        .collect()
    }
}

/// What the scanner located in a log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogScan<'a> {
    /// Line index of the header declaration; the data segment starts here.
    pub segment_start: usize,
    /// Column names declared after the header code, as they appear in the
    /// source. The last one still carries the line terminator.
    pub header: Vec<String>,
    /// `ScreenSize` and `ViewingDistance`; boundary times are not set yet.
    pub metadata: Sidecar,
    /// Text from the header line to the end of the file.
    pub body: &'a str,
}

/// Strip the line terminator from a metadata value token.
fn clean_value(token: &str) -> String {
    token.replace(['\n', '\r'], "")
}

/// Scan `text` until the header and both metadata declarations are found.
///
/// A later header declaration replaces an earlier one as long as the scan is
/// still running. Once everything is found the remaining lines are not
/// inspected.
pub fn scan(text: &str) -> Result<LogScan<'_>> {
    let mut pending = Pending::all();
    let mut segment: Option<(usize, usize)> = None;
    let mut header = Vec::new();
    let mut metadata = Sidecar::default();
    let mut offset = 0;

    for (index, line) in text.split_inclusive('\n').enumerate() {
        let line_offset = offset;
        offset += line.len();

        let mut fields = line.split(DELIMITER);
        let code = fields.next().unwrap_or_default();

        if code == HEADER_CODE {
            header = fields.map(str::to_string).collect();
            segment = Some((index, line_offset));
            pending.resolve(Pending::HEADER);
            debug!("Header declaration at line {}: {} columns", index, header.len());
        } else if code == METADATA_CODE {
            match fields.next() {
                Some(SCREEN_SIZE) => {
                    metadata.screen_size = fields.map(clean_value).collect();
                    pending.resolve(Pending::SCREEN_SIZE);
                    debug!("ScreenSize: {:?}", metadata.screen_size);
                }
                Some(VIEWING_DISTANCE) => {
                    metadata.viewing_distance = fields.map(clean_value).collect();
                    pending.resolve(Pending::VIEWING_DISTANCE);
                    debug!("ViewingDistance: {:?}", metadata.viewing_distance);
                }
                _ => {}
            }
        }

        if pending.is_done() {
            break;
        }
    }

    match segment {
        Some((segment_start, byte_offset)) if pending.is_done() => Ok(LogScan {
            segment_start,
            header,
            metadata,
            body: &text[byte_offset..],
        }),
        _ => Err(Error::MalformedLog {
            missing: pending.missing(),
        }),
    }
}
