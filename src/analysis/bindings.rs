use super::{
    dummy::synthesize,
    fold::fold,
    types::{CollectedBindings, ConstructionSite, ParamBinding, UnmappedParameter}
};
use crate::{
    config::AnalysisConfig,
    syntax::{AstQuery, ExprId, ExprKind, SymbolId, descendants}
};

/// Parameter registrations tied to `site`, in source order.
///
/// A registration is a call shaped `<command>.<parameters_member>.<method>(name,
/// value)` where `<command>` resolves to the variable the site initializes.
/// Calls of any other shape are ignored, and a site not assigned to a variable
/// has no bindings. Duplicate names are kept.
///
/// Under the strict policy a registration whose value type has no placeholder
/// is still collected, without a value, and is also listed in
/// [`CollectedBindings::unmapped`].
pub fn collect<Q: AstQuery + ?Sized>(
    query: &Q,
    site: &ConstructionSite,
    config: &AnalysisConfig
) -> CollectedBindings {
    let mut collected = CollectedBindings::default();
    let Some(command) = query.enclosing_declaration(site.expr) else {
        return collected;
    };

    for expr in descendants(query, query.statements(site.scope)) {
        let Some(args) = registration_args(query, expr, command, config) else {
            continue;
        };
        let Some(&name_arg) = args.first() else {
            continue;
        };
        let location = query.location(expr);
        let name = fold(query, name_arg);
        let value_type = args.get(1).and_then(|&value| query.static_type(value));
        let value = match synthesize(value_type, config.unmapped_types) {
            Ok(value) => Some(value),
            Err(e) => {
                collected.unmapped.push(UnmappedParameter {
                    name:      name.clone(),
                    type_name: e.type_name,
                    location:  location.clone()
                });
                None
            }
        };
        collected.bindings.push(ParamBinding {
            name,
            location,
            value
        });
    }
    collected
}

fn registration_args<'q, Q: AstQuery + ?Sized>(
    query: &'q Q,
    expr: ExprId,
    command: SymbolId,
    config: &AnalysisConfig
) -> Option<&'q [ExprId]> {
    let ExprKind::Call {
        callee,
        args
    } = query.kind(expr)?
    else {
        return None;
    };
    let ExprKind::MemberAccess {
        target: collection,
        member: method
    } = query.kind(*callee)?
    else {
        return None;
    };
    if !config.add_parameter_methods.iter().any(|m| m == method) {
        return None;
    }
    let ExprKind::MemberAccess {
        target: receiver,
        member
    } = query.kind(*collection)?
    else {
        return None;
    };
    if *member != config.parameters_member {
        return None;
    }
    let ExprKind::Identifier {
        ..
    } = query.kind(*receiver)?
    else {
        return None;
    };
    (query.symbol(*receiver)? == command).then_some(args.as_slice())
}
