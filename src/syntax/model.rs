use std::{collections::HashMap, fs::read_to_string, path::Path};

use serde::{Deserialize, Serialize};

use super::{
    AstQuery, descendants,
    types::{Declaration, ExprId, ExprKind, ScopeId, Span, SymbolId}
};
use crate::error::{AppResult, file_read_error, model_parse_error};

/// Expression node of an exported syntax model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprNode {
    #[serde(flatten)]
    pub kind:        ExprKind,
    #[serde(default)]
    pub span:        Span,
    /// Static type name as reported by the host
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub static_type: Option<String>,
    /// Symbol the node refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol:      Option<SymbolId>
}

/// Declared symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolNode {
    pub name:        String,
    /// Absent for symbols declared outside the exported file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<Declaration>
}

/// Block-like scope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScopeNode {
    /// Statement roots in source order, nested blocks included
    #[serde(default)]
    pub statements: Vec<ExprId>
}

/// One source file exported by a host, indexed for [`AstQuery`] lookups.
///
/// Ids are positions in the `exprs`, `symbols` and `scopes` tables. Loading
/// rejects dangling ids, expression cycles and nodes with two parents, so the
/// indexed model is always a forest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntaxModel {
    pub file:    String,
    #[serde(default)]
    pub exprs:   Vec<ExprNode>,
    #[serde(default)]
    pub symbols: Vec<SymbolNode>,
    #[serde(default)]
    pub scopes:  Vec<ScopeNode>,
    #[serde(skip)]
    parents:     Vec<Option<ExprId>>,
    #[serde(skip)]
    scope_of:    Vec<Option<ScopeId>>,
    #[serde(skip)]
    declared_by: HashMap<ExprId, SymbolId>
}

impl SyntaxModel {
    /// Build and index a model from its tables.
    pub fn new(
        file: impl Into<String>,
        exprs: Vec<ExprNode>,
        symbols: Vec<SymbolNode>,
        scopes: Vec<ScopeNode>
    ) -> AppResult<Self> {
        let mut model = Self {
            file: file.into(),
            exprs,
            symbols,
            scopes,
            ..Default::default()
        };
        model
            .index()
            .map_err(|e| model_parse_error(&model.file, e))?;
        Ok(model)
    }

    /// Parse a JSON export.
    pub fn from_json(origin: &str, content: &str) -> AppResult<Self> {
        let mut model: Self =
            serde_json::from_str(content).map_err(|e| model_parse_error(origin, e.to_string()))?;
        model.index().map_err(|e| model_parse_error(origin, e))?;
        Ok(model)
    }

    /// Parse a YAML export.
    pub fn from_yaml(origin: &str, content: &str) -> AppResult<Self> {
        let mut model: Self =
            serde_yaml::from_str(content).map_err(|e| model_parse_error(origin, e.to_string()))?;
        model.index().map_err(|e| model_parse_error(origin, e))?;
        Ok(model)
    }

    /// Read a model file; `.yaml`/`.yml` is YAML, anything else JSON.
    pub fn load(path: &Path) -> AppResult<Self> {
        let origin = path.display().to_string();
        let content = read_to_string(path).map_err(|e| file_read_error(&origin, e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&origin, &content),
            _ => Self::from_json(&origin, &content)
        }
    }

    fn index(&mut self) -> Result<(), String> {
        let expr_count = self.exprs.len();
        let check_expr = |id: ExprId, what: &str| -> Result<(), String> {
            if id.index() < expr_count {
                Ok(())
            } else {
                Err(format!("{} refers to missing expression {}", what, id))
            }
        };

        let mut parents = vec![None; expr_count];
        for (i, node) in self.exprs.iter().enumerate() {
            let owner = ExprId(i as u32);
            if let Some(symbol) = node.symbol
                && symbol.index() >= self.symbols.len()
            {
                return Err(format!(
                    "expression {} refers to missing symbol {}",
                    owner, symbol
                ));
            }
            for child in node.kind.children() {
                check_expr(child, &format!("expression {}", owner))?;
                if child == owner {
                    return Err(format!("expression {} contains itself", owner));
                }
                if parents[child.index()].replace(owner).is_some() {
                    return Err(format!("expression {} has more than one parent", child));
                }
            }
        }

        let mut declared_by = HashMap::new();
        for (i, symbol) in self.symbols.iter().enumerate() {
            if let Some(init) = symbol.declaration.as_ref().and_then(|d| d.initializer) {
                check_expr(init, &format!("symbol '{}'", symbol.name))?;
                declared_by.insert(init, SymbolId(i as u32));
            }
        }
        for (i, scope) in self.scopes.iter().enumerate() {
            for &stmt in &scope.statements {
                check_expr(stmt, &format!("scope {}", i))?;
            }
        }

        self.parents = parents;
        self.declared_by = declared_by;

        // In a forest every node is reachable from a parentless root.
        let roots: Vec<ExprId> = (0..expr_count)
            .filter(|&i| self.parents[i].is_none())
            .map(|i| ExprId(i as u32))
            .collect();
        let reachable = descendants(&*self, &roots).len();
        if reachable != expr_count {
            return Err(format!(
                "{} expression(s) form a cycle",
                expr_count - reachable
            ));
        }

        let mut scope_of = vec![None; expr_count];
        for (i, scope) in self.scopes.iter().enumerate() {
            for expr in descendants(&*self, &scope.statements) {
                scope_of[expr.index()].get_or_insert(ScopeId(i as u32));
            }
        }
        self.scope_of = scope_of;
        Ok(())
    }

    fn node(&self, expr: ExprId) -> Option<&ExprNode> {
        self.exprs.get(expr.index())
    }
}

impl AstQuery for SyntaxModel {
    fn file(&self) -> &str {
        &self.file
    }

    fn kind(&self, expr: ExprId) -> Option<&ExprKind> {
        self.node(expr).map(|n| &n.kind)
    }

    fn span(&self, expr: ExprId) -> Option<Span> {
        self.node(expr).map(|n| n.span)
    }

    fn symbol(&self, expr: ExprId) -> Option<SymbolId> {
        self.node(expr).and_then(|n| n.symbol)
    }

    fn declaration(&self, symbol: SymbolId) -> Option<&Declaration> {
        self.symbols
            .get(symbol.index())
            .and_then(|s| s.declaration.as_ref())
    }

    fn static_type(&self, expr: ExprId) -> Option<&str> {
        self.node(expr).and_then(|n| n.static_type.as_deref())
    }

    fn enclosing_declaration(&self, expr: ExprId) -> Option<SymbolId> {
        let mut current = Some(expr);
        while let Some(id) = current {
            if let Some(&symbol) = self.declared_by.get(&id) {
                return Some(symbol);
            }
            current = self.parents.get(id.index()).copied().flatten();
        }
        None
    }

    fn enclosing_scope(&self, expr: ExprId) -> Option<ScopeId> {
        self.scope_of.get(expr.index()).copied().flatten()
    }

    fn scopes(&self) -> Vec<ScopeId> {
        (0..self.scopes.len()).map(|i| ScopeId(i as u32)).collect()
    }

    fn statements(&self, scope: ScopeId) -> &[ExprId] {
        self.scopes
            .get(scope.index())
            .map(|s| s.statements.as_slice())
            .unwrap_or(&[])
    }
}
