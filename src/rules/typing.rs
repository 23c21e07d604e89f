use super::{Diagnostic, Rule, RuleCategory, RuleInfo, Severity};
use crate::analysis::SiteAnalysis;

pub const UNMAPPED_TYPE_RULE: RuleInfo = RuleInfo {
    id:       "SQLV003",
    name:     "Unmapped parameter type",
    severity: Severity::Error,
    category: RuleCategory::Typing
};

/// Registrations refused under strict placeholder synthesis, one finding each.
pub struct UnmappedParameterType;

impl Rule for UnmappedParameterType {
    fn info(&self) -> RuleInfo {
        UNMAPPED_TYPE_RULE
    }

    fn check(&self, site: &SiteAnalysis) -> Vec<Diagnostic> {
        site.unmapped
            .iter()
            .map(|unmapped| {
                let message = match &unmapped.type_name {
                    Some(name) => format!("Cannot synthesize a placeholder for type `{}`", name),
                    None => {
                        String::from("Cannot synthesize a placeholder for a value of unknown type")
                    }
                };
                Diagnostic::new(&UNMAPPED_TYPE_RULE, message, unmapped.location.clone(), site.index)
                    .with_suggestion("Use a scalar value or switch unmapped_types to lenient")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::{Bindings, UnmappedParameter},
        syntax::{Location, Span}
    };

    fn site(unmapped: Vec<UnmappedParameter>) -> SiteAnalysis {
        SiteAnalysis {
            index: 4,
            location: Location::default(),
            command_text: Ok("SELECT 1".into()),
            bindings: Bindings::new(),
            unmapped
        }
    }

    fn unmapped(type_name: Option<&str>, line: u32) -> UnmappedParameter {
        UnmappedParameter {
            name:      Ok("p".into()),
            type_name: type_name.map(str::to_string),
            location:  Location {
                file: "a.cs".into(),
                span: Span::new(line, 1, line, 20)
            }
        }
    }

    #[test]
    fn test_reports_unmapped_type() {
        let diags = UnmappedParameterType.check(&site(vec![unmapped(Some("Customer"), 3)]));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].site_index, 4);
        assert_eq!(diags[0].location.span.line, 3);
        assert!(diags[0].message.contains("`Customer`"));
    }

    #[test]
    fn test_one_finding_per_registration() {
        let diags =
            UnmappedParameterType.check(&site(vec![unmapped(Some("Customer"), 3), unmapped(None, 4)]));
        assert_eq!(diags.len(), 2);
        assert!(diags[1].message.ends_with("unknown type"));
    }

    #[test]
    fn test_silent_when_everything_mapped() {
        assert!(UnmappedParameterType.check(&site(Vec::new())).is_empty());
    }
}
