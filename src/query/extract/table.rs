use super::{ExtractionContext, set_expr::extract_from_set_expr};

pub fn extract_from_table_factor(
    table_factor: &sqlparser::ast::TableFactor,
    ctx: &mut ExtractionContext<'_>
) {
    use sqlparser::ast::TableFactor;

    match table_factor {
        TableFactor::Table {
            name, ..
        } => {
            ctx.tables.insert(name.to_string().into());
        }
        TableFactor::Derived {
            subquery, ..
        } => {
            *ctx.has_derived = true;
            extract_from_set_expr(&subquery.body, ctx);
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => {
            extract_from_table_factor(&table_with_joins.relation, ctx);
            for join in &table_with_joins.joins {
                extract_from_table_factor(&join.relation, ctx);
            }
        }
        // Table functions and the like produce columns nobody declared
        _ => *ctx.has_derived = true
    }
}
