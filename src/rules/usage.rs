use super::{Diagnostic, Rule, RuleCategory, RuleInfo, Severity};
use crate::{
    analysis::{ConstantValue, ParamBinding, SiteAnalysis},
    config::PlaceholderMatching
};

pub const UNUSED_PARAMETER_RULE: RuleInfo = RuleInfo {
    id:       "SQLV001",
    name:     "Unused parameter",
    severity: Severity::Warning,
    category: RuleCategory::Usage
};

/// Registered parameters whose placeholder never appears in the command text.
pub struct UnusedParameter {
    marker:   String,
    matching: PlaceholderMatching
}

impl UnusedParameter {
    pub fn new(marker: impl Into<String>, matching: PlaceholderMatching) -> Self {
        Self {
            marker: marker.into(),
            matching
        }
    }

    /// One diagnostic per binding whose `<marker><name>` token is absent.
    ///
    /// Silent when the command text is not a constant, and bindings whose
    /// name is not a constant are skipped. Duplicates are checked one by one.
    pub fn evaluate(
        &self,
        command_text: &ConstantValue,
        bindings: &[ParamBinding],
        site_index: usize
    ) -> Vec<Diagnostic> {
        let Ok(text) = command_text else {
            return Vec::new();
        };
        let text = match self.matching {
            PlaceholderMatching::Exact => text.clone(),
            PlaceholderMatching::IgnoreCase => text.to_lowercase()
        };

        bindings
            .iter()
            .filter_map(|binding| {
                let name = binding.name.as_ref().ok()?;
                let mut token = format!("{}{}", self.marker, name);
                if self.matching == PlaceholderMatching::IgnoreCase {
                    token = token.to_lowercase();
                }
                if text.contains(&token) {
                    return None;
                }
                Some(
                    Diagnostic::new(
                        &UNUSED_PARAMETER_RULE,
                        format!("Unused parameter: {}", name),
                        binding.location.clone(),
                        site_index
                    )
                    .with_suggestion(format!(
                        "Reference {}{} in the command text or remove the registration",
                        self.marker, name
                    ))
                )
            })
            .collect()
    }
}

impl Rule for UnusedParameter {
    fn info(&self) -> RuleInfo {
        UNUSED_PARAMETER_RULE
    }

    fn check(&self, site: &SiteAnalysis) -> Vec<Diagnostic> {
        self.evaluate(&site.command_text, &site.bindings, site.index)
    }
}
