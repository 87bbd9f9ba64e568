use esup_parser::{Class, Function, Method, MethodKind, NodeData, NodeIndex};

use super::Printer;

impl<'a> Printer<'a> {
    // =========================================================================
    // Statements and declarations
    // =========================================================================

    pub(super) fn emit_statement_data(&mut self, data: &'a NodeData) {
        match data {
            NodeData::Program { body } => {
                let mut first = true;
                for &stmt in body {
                    if self.tree.is_removed(stmt) {
                        continue;
                    }
                    if !first {
                        self.write_line();
                    }
                    first = false;
                    self.emit(stmt);
                }
            }
            NodeData::VariableDeclaration {
                keyword,
                declarators,
            } => {
                self.emit_declaration_list(*keyword, declarators);
                self.write_semicolon();
            }
            NodeData::Block { body } => self.emit_braced_statements(body),
            NodeData::Empty => self.write_semicolon(),
            NodeData::ExpressionStatement { expression } => {
                self.emit(*expression);
                self.write_semicolon();
            }
            NodeData::If {
                test,
                consequent,
                alternate,
            } => {
                self.write("if (");
                self.emit(*test);
                self.write(")");
                self.emit_embedded_statement(*consequent);
                if let Some(alternate) = alternate {
                    self.write(" else");
                    self.emit_embedded_statement(*alternate);
                }
            }
            NodeData::For {
                init,
                test,
                update,
                body,
            } => {
                self.write("for (");
                if let Some(init) = init {
                    self.emit_for_head_part(*init);
                }
                self.write(";");
                if let Some(test) = test {
                    self.write_space();
                    self.emit(*test);
                }
                self.write(";");
                if let Some(update) = update {
                    self.write_space();
                    self.emit(*update);
                }
                self.write(")");
                self.emit_embedded_statement(*body);
            }
            NodeData::ForIn {
                is_of,
                left,
                right,
                body,
            } => {
                self.write("for (");
                self.emit_for_head_part(*left);
                self.write(if *is_of { " of " } else { " in " });
                self.emit(*right);
                self.write(")");
                self.emit_embedded_statement(*body);
            }
            NodeData::While { test, body } => {
                self.write("while (");
                self.emit(*test);
                self.write(")");
                self.emit_embedded_statement(*body);
            }
            NodeData::DoWhile { body, test } => {
                self.write("do");
                self.emit_embedded_statement(*body);
                self.write(" while (");
                self.emit(*test);
                self.write(");");
            }
            NodeData::Return { argument } => {
                self.write("return");
                if let Some(argument) = argument {
                    self.write_space();
                    self.emit(*argument);
                }
                self.write_semicolon();
            }
            NodeData::Throw { argument } => {
                self.write("throw ");
                self.emit(*argument);
                self.write_semicolon();
            }
            NodeData::Break { label } | NodeData::Continue { label } => {
                self.write(if matches!(data, NodeData::Break { .. }) {
                    "break"
                } else {
                    "continue"
                });
                if let Some(label) = label {
                    self.write_space();
                    self.emit(*label);
                }
                self.write_semicolon();
            }
            NodeData::Try {
                block,
                handler,
                finalizer,
            } => {
                self.write("try ");
                self.emit(*block);
                if let Some(handler) = handler {
                    self.write_space();
                    self.emit(*handler);
                }
                if let Some(finalizer) = finalizer {
                    self.write(" finally ");
                    self.emit(*finalizer);
                }
            }
            NodeData::CatchClause { param, body } => {
                self.write("catch ");
                if let Some(param) = param {
                    self.write("(");
                    self.emit(*param);
                    self.write(") ");
                }
                self.emit(*body);
            }
            NodeData::Switch {
                discriminant,
                cases,
            } => {
                self.write("switch (");
                self.emit(*discriminant);
                self.write(") ");
                let saved = self.writer.sync_indent();
                self.write("{");
                self.increase_indent();
                for &case in cases {
                    self.write_line();
                    self.emit(case);
                }
                self.decrease_indent();
                self.write_line();
                self.write("}");
                self.writer.restore_indent(saved);
            }
            NodeData::SwitchCase { test, consequent } => {
                match test {
                    Some(test) => {
                        self.write("case ");
                        self.emit(*test);
                        self.write(":");
                    }
                    None => self.write("default:"),
                }
                let saved = self.writer.sync_indent();
                self.increase_indent();
                for &stmt in consequent {
                    if self.tree.is_removed(stmt) {
                        continue;
                    }
                    self.write_line();
                    self.emit(stmt);
                }
                self.writer.restore_indent(saved);
            }
            NodeData::Labeled { label, body } => {
                self.emit(*label);
                self.write(":");
                self.emit_embedded_statement(*body);
            }
            NodeData::Debugger => self.write("debugger;"),
            NodeData::With { object, body } => {
                self.write("with (");
                self.emit(*object);
                self.write(")");
                self.emit_embedded_statement(*body);
            }
            NodeData::Class(class) => self.emit_class(class),
            NodeData::Method(method) => self.emit_method(method),
            NodeData::Import { .. }
            | NodeData::ImportDefault { .. }
            | NodeData::ImportNamespace { .. }
            | NodeData::ImportSpecifier { .. }
            | NodeData::ExportNamed { .. }
            | NodeData::ExportSpecifier { .. }
            | NodeData::ExportDefault { .. }
            | NodeData::ExportAll { .. } => self.emit_module_data(data),
            NodeData::Removed => {}
            _ => self.emit_expression_data(data),
        }
    }

    /// `var a = 1, b` without the semicolon.
    pub(super) fn emit_declaration_list(&mut self, keyword: NodeIndex, declarators: &[NodeIndex]) {
        self.emit(keyword);
        self.write_space();
        self.emit_comma_separated(declarators);
    }

    pub(super) fn emit_function(&mut self, function: &'a Function) {
        if function.is_async {
            self.write("async ");
        }
        self.write("function");
        if function.is_generator {
            self.write_char('*');
        }
        if let Some(id) = function.id {
            self.write_space();
            self.emit(id);
        } else if !function.is_generator {
            self.write_space();
        }
        self.write("(");
        self.emit_comma_separated(&function.params);
        self.write(") ");
        self.emit(function.body);
    }

    pub(super) fn emit_class(&mut self, class: &'a Class) {
        self.write("class");
        if let Some(id) = class.id {
            self.write_space();
            self.emit(id);
        }
        if let Some(super_class) = class.super_class {
            self.write(" extends ");
            self.emit(super_class);
        }
        self.write_space();
        self.emit_class_members(&class.members);
    }

    pub(super) fn emit_method(&mut self, method: &'a Method) {
        if let Some(comments) = method.leading_comments {
            self.emit_moved_comments(comments);
        }
        if method.is_static {
            self.write("static ");
        }
        if method.is_async {
            self.write("async ");
        }
        if method.is_generator {
            self.write_char('*');
        }
        match method.kind {
            MethodKind::Get => self.write("get "),
            MethodKind::Set => self.write("set "),
            MethodKind::Constructor | MethodKind::Method => {}
        }
        if method.computed {
            self.write("[");
            self.emit(method.key);
            self.write("]");
        } else {
            self.emit(method.key);
        }
        self.write("(");
        self.emit_comma_separated(&method.params);
        self.write(") ");
        self.emit(method.body);
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn emit_module_data(&mut self, data: &'a NodeData) {
        match data {
            NodeData::Import { specifiers, source } => {
                self.write("import ");
                let live: Vec<NodeIndex> = specifiers
                    .iter()
                    .copied()
                    .filter(|s| !self.tree.is_removed(*s))
                    .collect();
                let (named, unbraced): (Vec<NodeIndex>, Vec<NodeIndex>) = live
                    .into_iter()
                    .partition(|s| matches!(self.tree.data(*s), NodeData::ImportSpecifier { .. }));
                self.emit_comma_separated(&unbraced);
                if !named.is_empty() {
                    if !unbraced.is_empty() {
                        self.write(", ");
                    }
                    self.write("{");
                    self.emit_comma_separated(&named);
                    self.write("}");
                }
                if !unbraced.is_empty() || !named.is_empty() {
                    self.write(" from ");
                }
                self.emit(*source);
                self.write_semicolon();
            }
            NodeData::ImportDefault { local } => self.emit(*local),
            NodeData::ImportNamespace { local } => {
                self.write("* as ");
                self.emit(*local);
            }
            NodeData::ImportSpecifier { imported, local } => {
                self.emit(*imported);
                if let Some(local) = local {
                    self.write(" as ");
                    self.emit(*local);
                }
            }
            NodeData::ExportNamed {
                declaration,
                specifiers,
                source,
            } => {
                self.write("export ");
                if let Some(declaration) = declaration {
                    self.emit(*declaration);
                    return;
                }
                self.write("{");
                self.emit_comma_separated(specifiers);
                self.write("}");
                if let Some(source) = source {
                    self.write(" from ");
                    self.emit(*source);
                }
                self.write_semicolon();
            }
            NodeData::ExportSpecifier { local, exported } => {
                self.emit(*local);
                if let Some(exported) = exported {
                    self.write(" as ");
                    self.emit(*exported);
                }
            }
            NodeData::ExportDefault { declaration } => {
                self.write("export default ");
                self.emit(*declaration);
                if !matches!(
                    self.tree.data(*declaration),
                    NodeData::Function(_) | NodeData::Class(_)
                ) {
                    self.write_semicolon();
                }
            }
            NodeData::ExportAll { exported, source } => {
                self.write("export *");
                if let Some(exported) = exported {
                    self.write(" as ");
                    self.emit(*exported);
                }
                self.write(" from ");
                self.emit(*source);
                self.write_semicolon();
            }
            _ => {}
        }
    }
}
