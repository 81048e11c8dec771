use std::fs;
use std::path::Path;

use crate::predict::{OrbitalElements, PredictError};

/// Load one satellite from a (possibly multi-satellite) TLE file.
///
/// With `norad_id` set the matching entry is returned, otherwise the first
/// entry in the file. Entries that fail to parse are skipped with a warning
/// unless they are the one asked for.
pub fn load_tle_file(path: &Path, norad_id: Option<u64>) -> Result<OrbitalElements, PredictError> {
    let content = fs::read_to_string(path)?;
    let filename = path.display().to_string();

    for (name, line1, line2) in parse_multi_tle(&content) {
        if let Some(wanted) = norad_id {
            if catalog_number(&line1) != Some(wanted) {
                continue;
            }
            return OrbitalElements::from_lines(name, &line1, &line2);
        }

        match OrbitalElements::from_lines(name, &line1, &line2) {
            Ok(elements) => return Ok(elements),
            Err(e) => log::warn!("Skipping bad entry in {}: {}", filename, e),
        }
    }

    Err(match norad_id {
        Some(norad_id) => PredictError::SatelliteNotFound {
            file: filename,
            norad_id,
        },
        None => PredictError::NoSatellites(filename),
    })
}

/// Columns 3-7 of line 1.
fn catalog_number(line1: &str) -> Option<u64> {
    line1.get(2..7)?.trim().parse().ok()
}

/// Split file content into (name, line1, line2) entries. Both the 2-line and
/// the 3-line (named) layouts are accepted, mixed freely.
pub fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
