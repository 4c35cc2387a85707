//! Confidence-gated escalation from the primary classifier to the refiners.
//!
//! The cascade is a small state machine. Every classification starts in
//! `Primary`; a confident or unambiguous prediction transitions straight to
//! `Resolved`, while a low-confidence prediction inside one of the ambiguity
//! sets transitions into the matching refine state. Refinement is single
//! level: a refiner's output is terminal and is never re-checked against the
//! ambiguity sets. A degenerate hand crop takes an explicit fallback
//! transition back to the primary label instead of erroring.

use crate::{
    classifier::Prediction,
    constants::DEFAULT_CONFIDENCE_THRESHOLD,
    cropper::CropImage,
    refiners::{BwRefiner, ClosedFistRefiner},
    Error, Result,
};

/// States of the classification cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeState {
    /// Awaiting the primary prediction
    Primary,
    /// Primary label is a closed-fist letter below threshold
    ClosedFistRefine,
    /// Primary label is B or W below threshold
    BwRefine,
    /// Terminal: a final label has been chosen
    Resolved,
}

/// Which transition produced the final label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeOutcome {
    /// Primary prediction accepted directly
    Primary,
    /// Closed-fist refiner overrode the label
    ClosedFistRefined,
    /// B/W refiner overrode the label
    BwRefined,
    /// Refinement was due but the crop was empty; primary label kept
    EmptyCropFallback,
}

/// Final cascade result.
///
/// `confidence` is always the primary model's probability: refiners replace
/// the label, not the confidence, and their output is not gated further.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub label: char,
    pub confidence: f32,
    pub outcome: CascadeOutcome,
}

/// The two disjoint sets of labels that trigger refinement
#[derive(Debug, Clone)]
pub struct AmbiguitySets {
    closed_fist: Vec<char>,
    bw: Vec<char>,
}

impl Default for AmbiguitySets {
    fn default() -> Self {
        Self {
            closed_fist: vec!['A', 'E', 'O', 'S', 'M', 'N', 'T'],
            bw: vec!['B', 'W'],
        }
    }
}

impl AmbiguitySets {
    /// Build ambiguity sets, enforcing disjointness
    ///
    /// # Errors
    ///
    /// Returns an error if any label appears in both sets.
    pub fn new(closed_fist: Vec<char>, bw: Vec<char>) -> Result<Self> {
        if let Some(shared) = closed_fist.iter().find(|c| bw.contains(c)) {
            return Err(Error::ConfigError(format!(
                "label {shared} appears in both ambiguity sets"
            )));
        }
        Ok(Self { closed_fist, bw })
    }

    /// Labels routed to the closed-fist refiner
    #[must_use]
    pub fn closed_fist_labels(&self) -> &[char] {
        &self.closed_fist
    }

    /// Labels routed to the B/W refiner
    #[must_use]
    pub fn bw_labels(&self) -> &[char] {
        &self.bw
    }

    #[must_use]
    pub fn is_closed_fist(&self, label: char) -> bool {
        self.closed_fist.contains(&label)
    }

    #[must_use]
    pub fn is_bw(&self, label: char) -> bool {
        self.bw.contains(&label)
    }
}

/// Decides whether and how a primary prediction is refined
#[derive(Debug, Clone)]
pub struct CascadeController {
    sets: AmbiguitySets,
    threshold: f32,
}

impl Default for CascadeController {
    fn default() -> Self {
        Self::new(AmbiguitySets::default(), DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl CascadeController {
    #[must_use]
    pub fn new(sets: AmbiguitySets, threshold: f32) -> Self {
        Self { sets, threshold }
    }

    /// Transition out of [`CascadeState::Primary`] for a prediction.
    ///
    /// Confidence at or above the threshold resolves immediately, as does a
    /// label outside both ambiguity sets.
    #[must_use]
    pub fn route(&self, prediction: &Prediction) -> CascadeState {
        if prediction.confidence >= self.threshold {
            return CascadeState::Resolved;
        }
        if self.sets.is_closed_fist(prediction.label) {
            CascadeState::ClosedFistRefine
        } else if self.sets.is_bw(prediction.label) {
            CascadeState::BwRefine
        } else {
            CascadeState::Resolved
        }
    }

    /// Run the cascade to its terminal state.
    ///
    /// `crop` may be `None` when the padded hand region degenerated to zero
    /// area; refinement is then skipped and the primary label kept (the
    /// [`CascadeOutcome::EmptyCropFallback`] transition, never an error).
    ///
    /// # Errors
    ///
    /// Returns an error only if an invoked refiner fails.
    pub fn resolve(
        &self,
        primary: Prediction,
        crop: Option<&CropImage>,
        closed_fist: &ClosedFistRefiner,
        bw: &BwRefiner,
    ) -> Result<Resolution> {
        let refined = match self.route(&primary) {
            CascadeState::Primary | CascadeState::Resolved => {
                return Ok(Resolution {
                    label: primary.label,
                    confidence: primary.confidence,
                    outcome: CascadeOutcome::Primary,
                })
            }
            CascadeState::ClosedFistRefine => match crop {
                Some(crop) => Some((closed_fist.refine(crop)?, CascadeOutcome::ClosedFistRefined)),
                None => None,
            },
            CascadeState::BwRefine => match crop {
                Some(crop) => Some((bw.refine(crop)?, CascadeOutcome::BwRefined)),
                None => None,
            },
        };

        match refined {
            Some((prediction, outcome)) => Ok(Resolution {
                label: prediction.label,
                confidence: primary.confidence,
                outcome,
            }),
            None => {
                log::warn!("hand crop was empty, keeping primary label {}", primary.label);
                Ok(Resolution {
                    label: primary.label,
                    confidence: primary.confidence,
                    outcome: CascadeOutcome::EmptyCropFallback,
                })
            }
        }
    }
}
