//! Static analysis of SQL command construction sites.
//!
//! # Pipeline
//!
//! ```text
//! ┌───────────────┐   ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ TriggerMatcher│──▶│ConstantFolder│──▶│ BindingCollector │──▶│ SiteAnalysis │
//! │  (trigger)    │   │   (fold)     │   │ (bindings+dummy) │   │              │
//! └───────────────┘   └──────────────┘   └──────────────────┘   └──────────────┘
//! ```
//!
//! Each construction site is analyzed on its own from an immutable host view,
//! so sites and files run in parallel with [`rayon`] without coordination.
//! Resolution failures are values ([`Unresolved`]), never errors.
//!
//! ```
//! use sql_param_validator::{
//!     analysis::Analyzer, config::AnalysisConfig, syntax::SyntaxModelBuilder
//! };
//!
//! let mut b = SyntaxModelBuilder::new("Repo.cs");
//! let head = b.literal("SELECT * FROM ");
//! let table = b.literal("T");
//! let sql = b.concat(head, table);
//! let ctor = b.construct("System.Data.SqlClient.SqlCommand", &[sql]);
//! b.declare("cmd", Some(ctor));
//! b.scope(&[ctor]);
//! let model = b.build().unwrap();
//!
//! let sites = Analyzer::new(AnalysisConfig::default()).analyze(&model);
//! assert_eq!(sites[0].command_text.as_deref(), Ok("SELECT * FROM T"));
//! ```

pub mod bindings;
pub mod dummy;
pub mod fold;
pub mod trigger;
mod types;

pub use bindings::collect;
pub use dummy::{DummyValue, UnmappedType, UnmappedTypePolicy, synthesize};
pub use fold::fold;
use rayon::prelude::*;
pub use trigger::{find, find_all};
pub use types::{
    Bindings, CollectedBindings, ConstantValue, ConstructionSite, ParamBinding, SiteAnalysis,
    UnmappedParameter, Unresolved
};

use crate::{
    config::AnalysisConfig,
    syntax::{AstQuery, ExprKind, SyntaxModel}
};

/// Runs trigger matching, folding and binding collection per site.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one construction site.
    pub fn analyze_site<Q: AstQuery + ?Sized>(
        &self,
        query: &Q,
        site: &ConstructionSite,
        index: usize
    ) -> SiteAnalysis {
        let command_text = match query.kind(site.expr) {
            Some(ExprKind::Construct {
                args, ..
            }) => args
                .first()
                .map_or(Err(Unresolved::MissingArgument), |&arg| fold(query, arg)),
            _ => Err(Unresolved::UnknownNode)
        };
        if let Err(reason) = &command_text {
            tracing::debug!(site = %site.location, %reason, "command text is not a constant");
        }

        let collected = collect(query, site, &self.config);
        tracing::debug!(
            site = %site.location,
            bindings = collected.bindings.len(),
            unmapped = collected.unmapped.len(),
            "construction site analyzed"
        );

        SiteAnalysis {
            index,
            location: site.location.clone(),
            command_text,
            bindings: collected.bindings,
            unmapped: collected.unmapped
        }
    }

    /// Analyze every construction site of one file.
    pub fn analyze<Q: AstQuery + Sync + ?Sized>(&self, query: &Q) -> Vec<SiteAnalysis> {
        find_all(query, &self.config.command_type)
            .par_iter()
            .enumerate()
            .map(|(index, site)| self.analyze_site(query, site, index))
            .collect()
    }

    /// Analyze several files; site indices run across all of them.
    pub fn analyze_all(&self, models: &[SyntaxModel]) -> Vec<SiteAnalysis> {
        let per_file: Vec<Vec<SiteAnalysis>> =
            models.par_iter().map(|model| self.analyze(model)).collect();
        per_file
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(index, mut site)| {
                site.index = index;
                site
            })
            .collect()
    }
}
