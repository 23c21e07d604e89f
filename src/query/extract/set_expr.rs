use super::{ExtractionContext, expr::extract_columns_from_expr, table::extract_from_table_factor};

pub fn extract_from_set_expr(set_expr: &sqlparser::ast::SetExpr, ctx: &mut ExtractionContext<'_>) {
    use sqlparser::ast::SetExpr;
    match set_expr {
        SetExpr::Select(select) => {
            for item in &select.projection {
                if let sqlparser::ast::SelectItem::UnnamedExpr(expr)
                | sqlparser::ast::SelectItem::ExprWithAlias {
                    expr, ..
                } = item
                {
                    extract_columns_from_expr(expr, ctx.columns);
                }
            }
            for table in &select.from {
                extract_from_table_factor(&table.relation, ctx);
                for join in &table.joins {
                    extract_from_table_factor(&join.relation, ctx);
                    match &join.join_operator {
                        sqlparser::ast::JoinOperator::Inner(constraint)
                        | sqlparser::ast::JoinOperator::LeftOuter(constraint)
                        | sqlparser::ast::JoinOperator::RightOuter(constraint)
                        | sqlparser::ast::JoinOperator::FullOuter(constraint) => {
                            if let sqlparser::ast::JoinConstraint::On(expr) = constraint {
                                extract_columns_from_expr(expr, ctx.columns);
                            }
                        }
                        _ => {}
                    }
                }
            }
            if let Some(selection) = &select.selection {
                extract_columns_from_expr(selection, ctx.columns);
            }
            if let sqlparser::ast::GroupByExpr::Expressions(exprs, _) = &select.group_by {
                for expr in exprs {
                    extract_columns_from_expr(expr, ctx.columns);
                }
            }
            if let Some(having) = &select.having {
                extract_columns_from_expr(having, ctx.columns);
            }
        }
        SetExpr::SetOperation {
            left,
            right,
            ..
        } => {
            extract_from_set_expr(left, ctx);
            extract_from_set_expr(right, ctx);
        }
        SetExpr::Query(query) => extract_from_set_expr(&query.body, ctx),
        _ => {}
    }
}
