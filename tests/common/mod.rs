//! Test utilities for building eye-tracker log files
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header of a full recording, including the `DeltaTime` column.
pub const FULL_HEADER: &[&str] = &[
    "TotalTime",
    "DeltaTime",
    "X_Gaze",
    "Y_Gaze",
    "Region",
    "PupilWidth",
    "PupilHeight",
    "Quality",
    "Fixation",
    "Count",
    "Marker",
];

/// Header without `DeltaTime`.
pub const SHORT_HEADER: &[&str] = &[
    "TotalTime",
    "X_Gaze",
    "Y_Gaze",
    "PupilWidth",
    "PupilHeight",
    "Region",
    "Quality",
    "Fixation",
    "Count",
    "Marker",
];

pub const CANONICAL_HEADER_LINE: &str = "eye_timestamp\teye1_x_coordinate\teye1_y_coordinate\t\
eye1_pupil_width\teye1_pupil_height\tRegion\tQuality\tFixation\tCount\tMarker\n";

/// Builder for creating eye-tracker log text
pub struct EyeLogBuilder {
    lines: Vec<String>,
}

impl EyeLogBuilder {
    /// Create an empty log
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add the kind of preamble a recording starts with
    pub fn preamble(self) -> Self {
        self.line(&["3", "TimeValues", "TotalTime", "DeltaTime"])
            .line(&["2", "ViewPoint", "2.9.2.5"])
            .line(&["3", "Version", "2"])
    }

    /// Add a line made of tab-separated fields
    pub fn line(mut self, fields: &[&str]) -> Self {
        self.lines.push(format!("{}\n", fields.join("\t")));
        self
    }

    /// Add a line verbatim (no terminator appended)
    pub fn raw(mut self, text: &str) -> Self {
        self.lines.push(text.to_string());
        self
    }

    /// Add a header declaration
    pub fn header(self, columns: &[&str]) -> Self {
        let mut fields = vec!["5"];
        fields.extend_from_slice(columns);
        self.line(&fields)
    }

    pub fn screen_size(self, width: &str, height: &str) -> Self {
        self.line(&["3", "ScreenSize", width, height])
    }

    pub fn viewing_distance(self, distance: &str) -> Self {
        self.line(&["3", "ViewingDistance", distance])
    }

    /// Add a sample row laid out for [`SHORT_HEADER`]
    pub fn short_row(self, code: &str, time: &str, count: &str) -> Self {
        self.line(&[code, time, "0.5", "0.5", "0.1", "0.1", "1", "0", "0", count, ""])
    }

    /// Add a sample row laid out for [`FULL_HEADER`]
    pub fn full_row(self, code: &str, time: &str, count: &str) -> Self {
        self.line(&[code, time, "16.7", "0.5", "0.5", "1", "0.1", "0.1", "0", "0", count, ""])
    }

    pub fn build(self) -> String {
        self.lines.concat()
    }

    pub fn write_to(self, path: &Path) {
        File::create(path)
            .unwrap()
            .write_all(self.build().as_bytes())
            .unwrap();
    }
}

/// Header, metadata, start row, three samples, one extraneous row and a stop row.
pub fn scenario_log() -> EyeLogBuilder {
    EyeLogBuilder::new()
        .preamble()
        .screen_size("1920", "1080")
        .viewing_distance("60")
        .header(SHORT_HEADER)
        .short_row("16", "100.0", "0")
        .short_row("9", "116.7", "1")
        .short_row("7", "120.0", "0")
        .short_row("9", "133.3", "2")
        .short_row("9", "150.0", "3")
        .short_row("12", "900.0", "0")
}

/// Same as [`scenario_log`] without the start row.
pub fn scenario_log_without_start() -> EyeLogBuilder {
    EyeLogBuilder::new()
        .screen_size("1920", "1080")
        .viewing_distance("60")
        .header(SHORT_HEADER)
        .short_row("9", "116.7", "1")
        .short_row("9", "133.3", "2")
        .short_row("9", "150.0", "3")
        .short_row("12", "900.0", "0")
}

/// Table expected from [`scenario_log`].
pub fn scenario_tsv() -> String {
    format!(
        "{}{}{}{}",
        CANONICAL_HEADER_LINE,
        "116.7\t0.5\t0.5\t0.1\t0.1\t1\t0\t0\t1\t\n",
        "133.3\t0.5\t0.5\t0.1\t0.1\t1\t0\t0\t2\t\n",
        "150.0\t0.5\t0.5\t0.1\t0.1\t1\t0\t0\t3\t\n",
    )
}

/// Bytes that are not valid UTF-8.
pub fn undecodable_bytes() -> Vec<u8> {
    let mut data = b"3\tScreenSize\t1920\t1080\n".to_vec();
    data.extend_from_slice(&[0xff, 0xfe, 0x00, 0xc3, 0x28, b'\n']);
    data
}
