//! Outcome and tally types for matching runs

/// Terminal state of one scanned document. Every document lands in exactly
/// one of these; none of them aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Renamed in place to the roster-derived name.
    Renamed { new_name: String },
    /// Copied into the output folder.
    Copied { dest_name: String },
    /// Moved into the output folder.
    Moved { dest_name: String },
    /// Filename fits no known pattern; never a candidate.
    NoPattern,
    /// A key was extracted but the roster has no row for it.
    KeyNotFound { key: String },
    /// The roster row exists but a field the new name needs is blank.
    EmptyField { key: String, field: PayloadField },
    /// Rename target already exists; the document was left untouched.
    CollisionSkipped { new_name: String },
    /// The filesystem action itself failed.
    Failed { message: String },
}

/// Roster field a rename needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadField {
    Name,
    IdNumber,
}

impl PayloadField {
    pub fn label(self) -> &'static str {
        match self {
            PayloadField::Name => "name",
            PayloadField::IdNumber => "ID number",
        }
    }
}

/// Counter class an outcome lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    Matched,
    Unmatched,
    Skipped,
    Error,
}

impl Outcome {
    pub fn class(&self) -> OutcomeClass {
        match self {
            Outcome::Renamed { .. } | Outcome::Copied { .. } | Outcome::Moved { .. } => {
                OutcomeClass::Matched
            }
            Outcome::NoPattern => OutcomeClass::Skipped,
            Outcome::KeyNotFound { .. }
            | Outcome::EmptyField { .. }
            | Outcome::CollisionSkipped { .. } => OutcomeClass::Unmatched,
            Outcome::Failed { .. } => OutcomeClass::Error,
        }
    }
}

/// One event per scanned document, emitted in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEvent {
    pub file_name: String,
    pub outcome: Outcome,
}

/// Per-run tally; exactly one increment per scanned document, so the
/// counters always sum back to the snapshot size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub matched: usize,
    pub unmatched: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome.class() {
            OutcomeClass::Matched => self.matched += 1,
            OutcomeClass::Unmatched => self.unmatched += 1,
            OutcomeClass::Skipped => self.skipped += 1,
            OutcomeClass::Error => self.errors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.matched + self.unmatched + self.skipped + self.errors
    }
}
