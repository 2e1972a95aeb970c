//! Document filename grammars
//!
//! The batch jobs recognize three filename conventions: agreement PDFs named
//! by contract number, agreement PDFs named by employee name plus resident ID
//! number, and commitment letters named around the 承诺书 marker. Each
//! grammar is a pure function over the file name; a name that does not fit
//! returns `None`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed literal prefix of termination-agreement documents.
pub const AGREEMENT_PREFIX: &str = "协商解除劳动合同协议书_";

/// Marker that identifies commitment-letter documents.
pub const COMMITMENT_MARKER: &str = "承诺书";

static CONTRACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{}(\d+)\.pdf$", AGREEMENT_PREFIX)).unwrap());

static NAME_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^{}(.+?)(\d{{17}}[\dX])\.pdf$",
        AGREEMENT_PREFIX
    ))
    .unwrap()
});

static ID_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{17}[\dXx]").unwrap());

static NAME_THEN_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(.+?)-{}(?:\(\d+\))?\.pdf$",
        COMMITMENT_MARKER
    ))
    .unwrap()
});

static MARKER_THEN_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{}-(.+?)(?:\(\d+\))?\.pdf$",
        COMMITMENT_MARKER
    ))
    .unwrap()
});

static TWO_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)-(.+?)(?:\(\d+\))?\.pdf$").unwrap());

/// Contract number from an agreement filename: `<prefix><digits>.pdf`,
/// nothing more and nothing less.
pub fn extract_contract_number(file_name: &str) -> Option<String> {
    let caps = CONTRACT_RE.captures(file_name)?;
    Some(caps[1].to_string())
}

/// Employee name and resident ID number from an agreement filename:
/// `<prefix><name><17 digits + digit-or-X>.pdf`. The ID is uppercased so
/// a trailing lowercase `x` check digit compares equal everywhere.
pub fn extract_name_and_id(file_name: &str) -> Option<(String, String)> {
    if let Some(caps) = NAME_ID_RE.captures(file_name) {
        let name = caps[1].to_string();
        let id_number = caps[2].to_uppercase();
        return Some((name, id_number));
    }

    // The anchored pattern needs at least one character of name; files named
    // by ID alone land here. Take the last ID-shaped token in the stem and
    // verify it sits at the very end.
    let stem = strip_pdf_suffix(file_name);
    let id_number = ID_TOKEN_RE.find_iter(stem).last()?.as_str().to_uppercase();
    let remaining = stem.strip_prefix(AGREEMENT_PREFIX)?;
    let split = remaining.len().checked_sub(id_number.len())?;
    if !remaining.is_char_boundary(split) {
        return None;
    }
    let (name, tail) = remaining.split_at(split);
    if !tail.eq_ignore_ascii_case(&id_number) {
        return None;
    }
    Some((name.to_string(), id_number))
}

fn strip_pdf_suffix(file_name: &str) -> &str {
    let len = file_name.len();
    if len >= 4
        && file_name.is_char_boundary(len - 4)
        && file_name[len - 4..].eq_ignore_ascii_case(".pdf")
    {
        &file_name[..len - 4]
    } else {
        file_name
    }
}

/// Employee name from a commitment-letter filename. Patterns are tried in
/// order; a candidate that trims to nothing is discarded and the next
/// pattern gets a chance.
pub fn extract_employee_name(file_name: &str) -> Option<String> {
    if let Some(caps) = NAME_THEN_MARKER_RE.captures(file_name) {
        let name = caps[1].trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }

    if let Some(caps) = MARKER_THEN_NAME_RE.captures(file_name) {
        let name = caps[1].trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }

    // Generic `first-second` shape: whichever segment carries the marker
    // identifies the other one as the name.
    if let Some(caps) = TWO_SEGMENT_RE.captures(file_name) {
        let first = caps[1].trim();
        let second = caps[2].trim();
        if second.contains(COMMITMENT_MARKER) {
            if !first.is_empty() {
                return Some(first.to_string());
            }
        } else if first.contains(COMMITMENT_MARKER) && !second.is_empty() {
            return Some(second.to_string());
        }
    }

    None
}
