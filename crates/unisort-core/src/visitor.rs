//! AST visitor for reaching every type hint in a PHP syntax tree
//!
//! Default implementations walk statements, class-like members and
//! expressions down to the places a type hint can appear: parameters,
//! return types, properties, typed class constants and catch clauses.
//! Rules override [`Visitor::visit_hint`] to act on the hints they care about.

use mago_syntax::ast::*;

/// Trait for visiting the type hints of a PHP program
pub trait Visitor<'a> {
    /// Called for each type hint. Return `true` to continue into nested hints.
    fn visit_hint(&mut self, _hint: &Hint<'a>, _source: &str) -> bool {
        true
    }

    /// Visit a program (entry point)
    fn visit_program(&mut self, program: &Program<'a>, source: &str) {
        for stmt in program.statements.iter() {
            self.traverse_statement(stmt, source);
        }
    }

    /// Traverse a hint and its nested hints
    fn traverse_hint(&mut self, hint: &Hint<'a>, source: &str) {
        if !self.visit_hint(hint, source) {
            return;
        }

        match hint {
            Hint::Union(union) => {
                self.traverse_hint(&union.left, source);
                self.traverse_hint(&union.right, source);
            }
            Hint::Intersection(intersection) => {
                self.traverse_hint(&intersection.left, source);
                self.traverse_hint(&intersection.right, source);
            }
            Hint::Nullable(nullable) => {
                self.traverse_hint(&nullable.hint, source);
            }
            Hint::Parenthesized(paren) => {
                self.traverse_hint(&paren.hint, source);
            }
            _ => {}
        }
    }

    /// Traverse parameter type hints
    fn traverse_parameter_list(&mut self, params: &FunctionLikeParameterList<'a>, source: &str) {
        for param in params.parameters.iter() {
            if let Some(hint) = &param.hint {
                self.traverse_hint(hint, source);
            }
        }
    }

    /// Traverse a statement and its children
    fn traverse_statement(&mut self, stmt: &Statement<'a>, source: &str) {
        match stmt {
            Statement::Function(func) => {
                self.traverse_parameter_list(&func.parameter_list, source);
                if let Some(ret) = &func.return_type_hint {
                    self.traverse_hint(&ret.hint, source);
                }
                self.traverse_block(&func.body, source);
            }
            Statement::Class(class) => {
                for member in class.members.iter() {
                    self.traverse_class_like_member(member, source);
                }
            }
            Statement::Interface(iface) => {
                for member in iface.members.iter() {
                    self.traverse_class_like_member(member, source);
                }
            }
            Statement::Trait(tr) => {
                for member in tr.members.iter() {
                    self.traverse_class_like_member(member, source);
                }
            }
            Statement::Enum(enum_def) => {
                for member in enum_def.members.iter() {
                    self.traverse_class_like_member(member, source);
                }
            }
            Statement::Namespace(ns) => {
                let statements = match &ns.body {
                    NamespaceBody::Implicit(body) => &body.statements,
                    NamespaceBody::BraceDelimited(body) => &body.statements,
                };
                for inner in statements.iter() {
                    self.traverse_statement(inner, source);
                }
            }
            Statement::Block(block) => {
                self.traverse_block(block, source);
            }
            Statement::Expression(expr_stmt) => {
                self.traverse_expression(&expr_stmt.expression, source);
            }
            Statement::If(if_stmt) => {
                self.traverse_expression(&if_stmt.condition, source);
                self.traverse_if_body(&if_stmt.body, source);
            }
            Statement::Foreach(foreach) => {
                self.traverse_expression(&foreach.expression, source);
                match &foreach.body {
                    ForeachBody::Statement(inner) => self.traverse_statement(inner, source),
                    ForeachBody::ColonDelimited(block) => {
                        for inner in block.statements.iter() {
                            self.traverse_statement(inner, source);
                        }
                    }
                }
            }
            Statement::For(for_stmt) => match &for_stmt.body {
                ForBody::Statement(inner) => self.traverse_statement(inner, source),
                ForBody::ColonDelimited(block) => {
                    for inner in block.statements.iter() {
                        self.traverse_statement(inner, source);
                    }
                }
            },
            Statement::While(while_stmt) => {
                self.traverse_expression(&while_stmt.condition, source);
                match &while_stmt.body {
                    WhileBody::Statement(inner) => self.traverse_statement(inner, source),
                    WhileBody::ColonDelimited(block) => {
                        for inner in block.statements.iter() {
                            self.traverse_statement(inner, source);
                        }
                    }
                }
            }
            Statement::DoWhile(do_while) => {
                self.traverse_statement(do_while.statement, source);
                self.traverse_expression(do_while.condition, source);
            }
            Statement::Try(try_stmt) => {
                self.traverse_block(&try_stmt.block, source);
                for catch in try_stmt.catch_clauses.iter() {
                    self.traverse_hint(&catch.hint, source);
                    self.traverse_block(&catch.block, source);
                }
                if let Some(finally) = &try_stmt.finally_clause {
                    self.traverse_block(&finally.block, source);
                }
            }
            Statement::Switch(switch) => match &switch.body {
                SwitchBody::BraceDelimited(block) => {
                    for case in block.cases.iter() {
                        for inner in case.statements().iter() {
                            self.traverse_statement(inner, source);
                        }
                    }
                }
                SwitchBody::ColonDelimited(block) => {
                    for case in block.cases.iter() {
                        for inner in case.statements().iter() {
                            self.traverse_statement(inner, source);
                        }
                    }
                }
            },
            Statement::Return(ret) => {
                if let Some(expr) = &ret.value {
                    self.traverse_expression(expr, source);
                }
            }
            Statement::Echo(echo) => {
                for expr in echo.values.iter() {
                    self.traverse_expression(expr, source);
                }
            }
            _ => {}
        }
    }

    /// Traverse the statements of a block
    fn traverse_block(&mut self, block: &Block<'a>, source: &str) {
        for inner in block.statements.iter() {
            self.traverse_statement(inner, source);
        }
    }

    /// Traverse an if body
    fn traverse_if_body(&mut self, body: &IfBody<'a>, source: &str) {
        match body {
            IfBody::Statement(stmt_body) => {
                self.traverse_statement(stmt_body.statement, source);
                for else_if in stmt_body.else_if_clauses.iter() {
                    self.traverse_statement(else_if.statement, source);
                }
                if let Some(else_clause) = &stmt_body.else_clause {
                    self.traverse_statement(else_clause.statement, source);
                }
            }
            IfBody::ColonDelimited(block) => {
                for inner in block.statements.iter() {
                    self.traverse_statement(inner, source);
                }
                for else_if in block.else_if_clauses.iter() {
                    for inner in else_if.statements.iter() {
                        self.traverse_statement(inner, source);
                    }
                }
                if let Some(else_clause) = &block.else_clause {
                    for inner in else_clause.statements.iter() {
                        self.traverse_statement(inner, source);
                    }
                }
            }
        }
    }

    /// Traverse a class-like member
    fn traverse_class_like_member(&mut self, member: &ClassLikeMember<'a>, source: &str) {
        match member {
            ClassLikeMember::Method(method) => {
                self.traverse_parameter_list(&method.parameter_list, source);
                if let Some(ret) = &method.return_type_hint {
                    self.traverse_hint(&ret.hint, source);
                }
                if let MethodBody::Concrete(body) = &method.body {
                    self.traverse_block(body, source);
                }
            }
            ClassLikeMember::Property(Property::Plain(prop)) => {
                if let Some(hint) = &prop.hint {
                    self.traverse_hint(hint, source);
                }
            }
            ClassLikeMember::Constant(constant) => {
                if let Some(hint) = &constant.hint {
                    self.traverse_hint(hint, source);
                }
            }
            _ => {}
        }
    }

    /// Traverse the argument values of a call or instantiation
    fn traverse_argument_list(&mut self, arguments: &ArgumentList<'a>, source: &str) {
        for arg in arguments.arguments.iter() {
            self.traverse_expression(arg.value(), source);
        }
    }

    /// Traverse an expression looking for closures and arrow functions
    fn traverse_expression(&mut self, expr: &Expression<'a>, source: &str) {
        match expr {
            Expression::Closure(closure) => {
                self.traverse_parameter_list(&closure.parameter_list, source);
                if let Some(ret) = &closure.return_type_hint {
                    self.traverse_hint(&ret.hint, source);
                }
                self.traverse_block(&closure.body, source);
            }
            Expression::ArrowFunction(arrow) => {
                self.traverse_parameter_list(&arrow.parameter_list, source);
                if let Some(ret) = &arrow.return_type_hint {
                    self.traverse_hint(&ret.hint, source);
                }
                self.traverse_expression(&arrow.expression, source);
            }
            Expression::Call(call) => match call {
                Call::Function(func_call) => {
                    self.traverse_argument_list(&func_call.argument_list, source);
                }
                Call::Method(method_call) => {
                    self.traverse_expression(&method_call.object, source);
                    self.traverse_argument_list(&method_call.argument_list, source);
                }
                Call::NullSafeMethod(method_call) => {
                    self.traverse_expression(&method_call.object, source);
                    self.traverse_argument_list(&method_call.argument_list, source);
                }
                Call::StaticMethod(static_call) => {
                    self.traverse_argument_list(&static_call.argument_list, source);
                }
            },
            Expression::Instantiation(instantiation) => {
                self.traverse_expression(instantiation.class, source);
                if let Some(arguments) = &instantiation.argument_list {
                    self.traverse_argument_list(arguments, source);
                }
            }
            Expression::AnonymousClass(class) => {
                if let Some(arguments) = &class.argument_list {
                    self.traverse_argument_list(arguments, source);
                }
                for member in class.members.iter() {
                    self.traverse_class_like_member(member, source);
                }
            }
            Expression::Match(match_expr) => {
                self.traverse_expression(match_expr.expression, source);
                for arm in match_expr.arms.iter() {
                    match arm {
                        MatchArm::Expression(arm) => {
                            for condition in arm.conditions.iter() {
                                self.traverse_expression(condition, source);
                            }
                            self.traverse_expression(arm.expression, source);
                        }
                        MatchArm::Default(arm) => {
                            self.traverse_expression(arm.expression, source);
                        }
                    }
                }
            }
            Expression::Yield(yield_expr) => match yield_expr {
                Yield::Value(value) => {
                    if let Some(value) = value.value {
                        self.traverse_expression(value, source);
                    }
                }
                Yield::Pair(pair) => {
                    self.traverse_expression(pair.key, source);
                    self.traverse_expression(pair.value, source);
                }
                Yield::From(from) => {
                    self.traverse_expression(from.iterator, source);
                }
            },
            Expression::Throw(throw) => {
                self.traverse_expression(throw.exception, source);
            }
            Expression::Parenthesized(paren) => {
                self.traverse_expression(&paren.expression, source);
            }
            Expression::Assignment(assign) => {
                self.traverse_expression(&assign.lhs, source);
                self.traverse_expression(&assign.rhs, source);
            }
            Expression::Binary(binary) => {
                self.traverse_expression(&binary.lhs, source);
                self.traverse_expression(&binary.rhs, source);
            }
            Expression::Conditional(ternary) => {
                self.traverse_expression(&ternary.condition, source);
                if let Some(then) = &ternary.then {
                    self.traverse_expression(then, source);
                }
                self.traverse_expression(&ternary.r#else, source);
            }
            Expression::Array(arr) => {
                for elem in arr.elements.iter() {
                    if let ArrayElement::KeyValue(kv) = elem {
                        self.traverse_expression(&kv.key, source);
                        self.traverse_expression(&kv.value, source);
                    } else if let ArrayElement::Value(val) = elem {
                        self.traverse_expression(&val.value, source);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Helper function to run a visitor on a program
pub fn visit<'a, V: Visitor<'a>>(visitor: &mut V, program: &Program<'a>, source: &str) {
    visitor.visit_program(program, source);
}
