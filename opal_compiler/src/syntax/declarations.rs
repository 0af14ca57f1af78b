//! Module-level and member-level declaration parsing
//!
//! Covers the module envelope, using directives, interfaces, classes and
//! their members, and the signature prefix scan shared by functions,
//! methods, and constructors.

use crate::grammar::ast::{
    Class, Constructor, Field, Function, Interface, Member, MetadataEntry, MetadataKind,
    MethodSignature, Module, Output, Param, Property, TypeParamDecl, UsingDecl,
};
use crate::grammar::keywords::Keyword;
use crate::log_debug;
use crate::logging::codes;
use crate::reconcile::constructs;
use crate::syntax::parser::Parser;
use crate::tokens::Token;
use crate::utils::Span;

/// Signature clauses collected by the declaration prefix scan
#[derive(Debug, Default)]
pub(super) struct SignaturePrefix {
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<Param>,
    pub output: Option<Output>,
    pub effects: Option<crate::grammar::ast::EffectSet>,
    pub preconditions: Vec<crate::grammar::ast::Expression>,
    pub postconditions: Vec<crate::grammar::ast::Expression>,
    pub metadata: Vec<MetadataEntry>,
}

impl<'d> Parser<'d> {
    // ========================================================================
    // MODULE
    // ========================================================================

    pub(super) fn parse_module(&mut self) -> Module {
        let start_span = self.current_span();

        let attrs = if self.consume_keyword(Keyword::Module) {
            let (bag, attr_span) = self.read_attrs();
            constructs::module(&bag, attr_span, self.diagnostics)
        } else {
            self.unexpected_token("where a module tag was expected");
            constructs::ModuleAttrs {
                id: String::new(),
                name: String::new(),
                version: None,
            }
        };

        if self.preferences.log_construct_trace {
            log_debug!("Parsing module", "id" => attrs.id, "name" => attrs.name);
        }

        let mut usings = Vec::new();
        let mut interfaces = Vec::new();
        let mut classes = Vec::new();
        let mut functions = Vec::new();
        let mut metadata = Vec::new();

        while !self.is_at_end() && !self.check_keyword(Keyword::EndModule) {
            match self.current_keyword() {
                Some(Keyword::Using) => usings.push(self.parse_using()),
                Some(Keyword::Interface) => interfaces.push(self.parse_interface()),
                Some(Keyword::Class) => classes.push(self.parse_class()),
                Some(Keyword::Function) => {
                    functions.push(self.parse_callable(Keyword::Function, "function"))
                }
                Some(kw) if kw.is_metadata() => {
                    if let Some(entry) = self.parse_metadata_entry() {
                        metadata.push(entry);
                    }
                }
                _ => {
                    // Resynchronize by skipping a single token
                    self.unexpected_token("at module scope");
                    self.advance();
                }
            }
        }

        let close_span = self.expect_close(Keyword::EndModule, "module", Some(&attrs.id));

        Module {
            id: attrs.id,
            name: attrs.name,
            version: attrs.version,
            usings,
            interfaces,
            classes,
            functions,
            metadata,
            span: start_span.merge(close_span),
        }
    }

    fn parse_using(&mut self) -> UsingDecl {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::using(&bag, attr_span, self.diagnostics);
        UsingDecl {
            path: attrs.path,
            span: start_span.merge(attr_span),
        }
    }

    // ========================================================================
    // INTERFACES
    // ========================================================================

    fn parse_interface(&mut self) -> Interface {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::interface(&bag, attr_span, self.diagnostics);

        let mut methods = Vec::new();
        while !self.is_at_end() && !self.check_keyword(Keyword::EndInterface) {
            if self.check_keyword(Keyword::Method) {
                methods.push(self.parse_method_signature());
            } else {
                self.unexpected_token("inside an interface");
                self.advance();
            }
        }

        let close_span = self.expect_close(Keyword::EndInterface, "interface", Some(&attrs.id));

        Interface {
            id: attrs.id,
            name: attrs.name,
            visibility: attrs.visibility,
            methods,
            span: start_span.merge(close_span),
        }
    }

    /// A bodiless method declaration: signature clauses only
    fn parse_method_signature(&mut self) -> MethodSignature {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::function(&bag, attr_span, self.diagnostics);

        let prefix = self.parse_signature_prefix();

        let close_span = self.expect_close(Keyword::EndMethod, "method", Some(&attrs.id));

        MethodSignature {
            id: attrs.id,
            name: attrs.name,
            params: prefix.params,
            output: prefix.output,
            effects: prefix.effects.unwrap_or_default(),
            span: start_span.merge(close_span),
        }
    }

    // ========================================================================
    // CLASSES
    // ========================================================================

    fn parse_class(&mut self) -> Class {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::class(&bag, attr_span, self.diagnostics);

        if self.preferences.log_construct_trace {
            log_debug!("Parsing class", "id" => attrs.id, "name" => attrs.name);
        }

        let mut type_params = Vec::new();
        let mut members = Vec::new();
        let mut metadata = Vec::new();

        while !self.is_at_end() && !self.check_keyword(Keyword::EndClass) {
            match self.current_keyword() {
                Some(Keyword::Field) => members.push(Member::Field(self.parse_field())),
                Some(Keyword::Method) => {
                    members.push(Member::Method(self.parse_callable(Keyword::Method, "method")))
                }
                Some(Keyword::Property) => members.push(Member::Property(self.parse_property())),
                Some(Keyword::Constructor) => {
                    members.push(Member::Constructor(self.parse_constructor()))
                }
                Some(Keyword::TypeParam) => {
                    if let Some(decl) = self.parse_type_param() {
                        type_params.push(decl);
                    }
                }
                Some(Keyword::Where) => self.apply_where_clause(&mut type_params),
                Some(kw) if kw.is_metadata() => {
                    if let Some(entry) = self.parse_metadata_entry() {
                        metadata.push(entry);
                    }
                }
                _ => {
                    self.unexpected_token("inside a class body");
                    self.advance();
                }
            }
        }

        let close_span = self.expect_close(Keyword::EndClass, "class", Some(&attrs.id));

        Class {
            id: attrs.id,
            name: attrs.name,
            visibility: attrs.visibility,
            implements: attrs.implements,
            type_params,
            members,
            metadata,
            span: start_span.merge(close_span),
        }
    }

    fn parse_field(&mut self) -> Field {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::field(&bag, attr_span, self.diagnostics);

        // Initializer only when an explicit `=` follows the attributes
        let initializer = if self.tokens.advance_if_matches(&Token::Equals) {
            Some(self.parse_expression())
        } else {
            None
        };

        let end_span = initializer
            .as_ref()
            .map(|e| e.span)
            .unwrap_or(attr_span);

        Field {
            name: attrs.name,
            ty: attrs.ty,
            visibility: attrs.visibility,
            mutable: attrs.mutable,
            initializer,
            span: start_span.merge(end_span),
        }
    }

    fn parse_property(&mut self) -> Property {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::property(&bag, attr_span, self.diagnostics);

        let initializer = if self.tokens.advance_if_matches(&Token::Equals) {
            Some(self.parse_expression())
        } else {
            None
        };

        let close_span = self.expect_close(Keyword::EndProperty, "property", Some(&attrs.id));

        Property {
            id: attrs.id,
            name: attrs.name,
            ty: attrs.ty,
            visibility: attrs.visibility,
            initializer,
            span: start_span.merge(close_span),
        }
    }

    fn parse_constructor(&mut self) -> Constructor {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::constructor(&bag, attr_span, self.diagnostics);

        let prefix = self.parse_signature_prefix();
        let body = self.parse_statements_until(&[Keyword::EndConstructor]);
        let close_span = self.expect_close(Keyword::EndConstructor, "constructor", Some(&attrs.id));

        Constructor {
            id: attrs.id,
            visibility: attrs.visibility,
            params: prefix.params,
            effects: prefix.effects.unwrap_or_default(),
            body,
            span: start_span.merge(close_span),
        }
    }

    // ========================================================================
    // FUNCTIONS AND METHODS
    // ========================================================================

    /// Parse a function or method: attributes, signature prefix, body,
    /// closing tag
    pub(super) fn parse_callable(&mut self, open: Keyword, construct: &str) -> Function {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::function(&bag, attr_span, self.diagnostics);

        if self.preferences.log_construct_trace {
            log_debug!("Parsing callable", "construct" => construct, "id" => attrs.id);
        }

        let prefix = self.parse_signature_prefix();

        let end = open
            .corresponding_end()
            .unwrap_or(Keyword::EndFunction);
        let body = self.parse_statements_until(&[end]);
        let close_span = self.expect_close(end, construct, Some(&attrs.id));

        Function {
            id: attrs.id,
            name: attrs.name,
            visibility: attrs.visibility,
            type_params: prefix.type_params,
            params: prefix.params,
            output: prefix.output,
            effects: prefix.effects.unwrap_or_default(),
            preconditions: prefix.preconditions,
            postconditions: prefix.postconditions,
            body,
            metadata: prefix.metadata,
            span: start_span.merge(close_span),
        }
    }

    /// Fixed-order prefix scan over signature clauses. Stops at the first
    /// token that is not a clause; the scan never restarts, so clause tags
    /// after the body begins are body errors, not signature parts.
    pub(super) fn parse_signature_prefix(&mut self) -> SignaturePrefix {
        let mut prefix = SignaturePrefix::default();

        loop {
            match self.current_keyword() {
                Some(Keyword::TypeParam) => {
                    if let Some(decl) = self.parse_type_param() {
                        prefix.type_params.push(decl);
                    }
                }
                Some(Keyword::Where) => self.apply_where_clause(&mut prefix.type_params),
                Some(Keyword::Param) => prefix.params.push(self.parse_param()),
                Some(Keyword::Output) => {
                    let output = self.parse_output();
                    if prefix.output.is_some() {
                        self.diagnostics.error(
                            codes::syntax::UNEXPECTED_TOKEN,
                            output.span,
                            "duplicate output declaration".to_string(),
                        );
                    } else {
                        prefix.output = Some(output);
                    }
                }
                Some(Keyword::Effects) => {
                    self.advance();
                    let (bag, attr_span) = self.read_attrs();
                    let set = constructs::effects(&bag);
                    if prefix.effects.is_some() {
                        self.diagnostics.error(
                            codes::syntax::UNEXPECTED_TOKEN,
                            attr_span,
                            "duplicate effects declaration".to_string(),
                        );
                    } else {
                        prefix.effects = Some(set);
                    }
                }
                Some(Keyword::Pre) => {
                    self.advance();
                    prefix.preconditions.push(self.parse_expression());
                }
                Some(Keyword::Post) => {
                    self.advance();
                    prefix.postconditions.push(self.parse_expression());
                }
                Some(kw) if kw.is_metadata() => {
                    if let Some(entry) = self.parse_metadata_entry() {
                        prefix.metadata.push(entry);
                    }
                }
                _ => break,
            }
        }

        prefix
    }

    fn parse_type_param(&mut self) -> Option<TypeParamDecl> {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::type_param(&bag, attr_span, self.diagnostics);
        if attrs.name.is_empty() {
            return None;
        }
        Some(TypeParamDecl {
            name: attrs.name,
            constraints: attrs.constraints,
            span: start_span.merge(attr_span),
        })
    }

    /// A where clause extends an already-declared type parameter's
    /// constraint list; an unknown target is an error and produces nothing
    fn apply_where_clause(&mut self, type_params: &mut [TypeParamDecl]) {
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::where_clause(&bag, attr_span, self.diagnostics);

        match type_params.iter_mut().find(|tp| tp.name == attrs.target) {
            Some(decl) => decl.constraints.extend(attrs.constraints),
            None => {
                self.diagnostics.error(
                    codes::syntax::UNKNOWN_CONSTRAINT_TARGET,
                    attr_span,
                    format!("where clause names undeclared type parameter '{}'", attrs.target),
                );
            }
        }
    }

    fn parse_param(&mut self) -> Param {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::param(&bag, attr_span, self.diagnostics);
        Param {
            name: attrs.name,
            ty: attrs.ty,
            semantic: attrs.semantic,
            mutable: attrs.mutable,
            span: start_span.merge(attr_span),
        }
    }

    fn parse_output(&mut self) -> Output {
        let start_span = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::output(&bag, attr_span, self.diagnostics);
        Output {
            ty: attrs.ty,
            semantic: attrs.semantic,
            span: start_span.merge(attr_span),
        }
    }

    // ========================================================================
    // METADATA
    // ========================================================================

    pub(super) fn parse_metadata_entry(&mut self) -> Option<MetadataEntry> {
        let keyword = self.current_keyword()?;
        let start_span = self.current_span();
        self.advance();

        let kind = match keyword {
            Keyword::Todo => MetadataKind::Todo,
            Keyword::Fixme => MetadataKind::Fixme,
            Keyword::Hack => MetadataKind::Hack,
            Keyword::Assumption => MetadataKind::Assumption,
            Keyword::Invariant => MetadataKind::Invariant,
            Keyword::Context => MetadataKind::Context,
            Keyword::Author => MetadataKind::Author,
            Keyword::Decision => {
                let (bag, attr_span) = self.read_attrs();
                let attrs = constructs::decision(&bag, attr_span, self.diagnostics);
                MetadataKind::Decision {
                    id: attrs.id,
                    status: attrs.status,
                }
            }
            _ => return None,
        };

        let (text, end_span) = match self.tokens.current() {
            Some(spanned) => match &spanned.value {
                Token::StringLiteral(text) => {
                    let result = (text.clone(), spanned.span);
                    self.advance();
                    result
                }
                _ => (String::new(), start_span),
            },
            None => (String::new(), start_span),
        };

        Some(MetadataEntry {
            kind,
            text,
            span: start_span.merge(end_span),
        })
    }
}
