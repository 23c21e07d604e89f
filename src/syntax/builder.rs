use super::{
    model::{ExprNode, ScopeNode, SymbolNode, SyntaxModel},
    types::{Declaration, ExprId, ExprKind, ScopeId, Span, SymbolId}
};
use crate::error::AppResult;

/// Programmatic construction of a [`SyntaxModel`].
///
/// Every node gets its own line so locations stay distinguishable; use
/// [`with_span`](Self::with_span) for real positions.
pub struct SyntaxModelBuilder {
    file:    String,
    exprs:   Vec<ExprNode>,
    symbols: Vec<SymbolNode>,
    scopes:  Vec<ScopeNode>
}

impl SyntaxModelBuilder {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file:    file.into(),
            exprs:   Vec::new(),
            symbols: Vec::new(),
            scopes:  Vec::new()
        }
    }

    fn push(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        let line = id.0 + 1;
        self.exprs.push(ExprNode {
            kind,
            span: Span::new(line, 1, line, 1),
            static_type: None,
            symbol: None
        });
        id
    }

    pub fn literal(&mut self, value: impl Into<String>) -> ExprId {
        self.push(ExprKind::Literal {
            value: value.into()
        })
    }

    pub fn concat(&mut self, left: ExprId, right: ExprId) -> ExprId {
        self.push(ExprKind::Concat {
            left,
            right
        })
    }

    /// Identifier with an optional resolved symbol.
    pub fn identifier(&mut self, name: impl Into<String>, symbol: Option<SymbolId>) -> ExprId {
        let id = self.push(ExprKind::Identifier {
            name: name.into()
        });
        self.exprs[id.index()].symbol = symbol;
        id
    }

    /// Identifier referring to a declared symbol, named after it.
    pub fn reference(&mut self, symbol: SymbolId) -> ExprId {
        let name = self
            .symbols
            .get(symbol.index())
            .map(|s| s.name.clone())
            .unwrap_or_default();
        self.identifier(name, Some(symbol))
    }

    pub fn member(&mut self, target: ExprId, member: impl Into<String>) -> ExprId {
        self.push(ExprKind::MemberAccess {
            target,
            member: member.into()
        })
    }

    pub fn call(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        self.push(ExprKind::Call {
            callee,
            args: args.to_vec()
        })
    }

    pub fn construct(&mut self, type_name: impl Into<String>, args: &[ExprId]) -> ExprId {
        self.push(ExprKind::Construct {
            type_name: type_name.into(),
            args:      args.to_vec()
        })
    }

    pub fn other(&mut self, children: &[ExprId]) -> ExprId {
        self.push(ExprKind::Other {
            children: children.to_vec()
        })
    }

    /// `command.Parameters.<method>(args...)`
    pub fn parameter_call(&mut self, command: SymbolId, method: &str, args: &[ExprId]) -> ExprId {
        let target = self.reference(command);
        let parameters = self.member(target, "Parameters");
        let callee = self.member(parameters, method);
        self.call(callee, args)
    }

    pub fn with_type(&mut self, expr: ExprId, static_type: impl Into<String>) -> &mut Self {
        if let Some(node) = self.exprs.get_mut(expr.index()) {
            node.static_type = Some(static_type.into());
        }
        self
    }

    pub fn with_span(&mut self, expr: ExprId, span: Span) -> &mut Self {
        if let Some(node) = self.exprs.get_mut(expr.index()) {
            node.span = span;
        }
        self
    }

    /// Attach a symbol to any node, e.g. a member access naming a constant.
    pub fn bind(&mut self, expr: ExprId, symbol: SymbolId) -> &mut Self {
        if let Some(node) = self.exprs.get_mut(expr.index()) {
            node.symbol = Some(symbol);
        }
        self
    }

    /// Declare a symbol with an optional initializer.
    pub fn declare(&mut self, name: impl Into<String>, initializer: Option<ExprId>) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolNode {
            name:        name.into(),
            declaration: Some(Declaration {
                span: Span::default(),
                initializer
            })
        });
        id
    }

    /// Symbol whose declaration lives outside the file.
    pub fn external(&mut self, name: impl Into<String>) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolNode {
            name:        name.into(),
            declaration: None
        });
        id
    }

    /// Set the initializer of an already declared symbol.
    pub fn initialize(&mut self, symbol: SymbolId, initializer: ExprId) -> &mut Self {
        if let Some(declaration) = self
            .symbols
            .get_mut(symbol.index())
            .and_then(|s| s.declaration.as_mut())
        {
            declaration.initializer = Some(initializer);
        }
        self
    }

    pub fn scope(&mut self, statements: &[ExprId]) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeNode {
            statements: statements.to_vec()
        });
        id
    }

    pub fn build(self) -> AppResult<SyntaxModel> {
        SyntaxModel::new(self.file, self.exprs, self.symbols, self.scopes)
    }
}
