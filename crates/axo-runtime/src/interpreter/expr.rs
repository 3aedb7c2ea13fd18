//! Expression evaluation

use super::Interpreter;
use crate::ast::*;
use crate::span::Span;
use crate::stdlib;
use crate::typechecker::matches;
use crate::types::TypeExpr;
use crate::value::{FunctionRef, RuntimeError, Value};
use std::rc::Rc;

impl Interpreter {
    /// Evaluate an expression
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Int(n, _) => Ok(Value::Int(*n)),
            Expr::Float(n, _) => Ok(Value::Float(*n)),
            Expr::Bool(b, _) => Ok(Value::Bool(*b)),
            Expr::Str(s, span) => {
                if s.contains("${") {
                    self.interpolate(s, *span)
                } else {
                    Ok(Value::string(s.clone()))
                }
            }
            Expr::Ident(id) => self.eval_ident(id),
            Expr::Binary(binary) => self.eval_binary(binary),
            Expr::Unary(unary) => self.eval_unary(unary),
            Expr::Call(call) => self.eval_call(call),
            Expr::Index(index) => self.eval_index(index),
            Expr::Field(field) => self.eval_field(field),
            Expr::Array(arr) => self.eval_array_literal(arr),
            Expr::Object(obj) => self.eval_object_literal(obj),
            Expr::Function(func) => Ok(Value::Function(FunctionRef::Expr(Rc::clone(func)))),
            Expr::Assign(assign) => self.eval_assign(assign),
            Expr::IndexAssign(assign) => self.eval_index_assign(assign),
            Expr::FieldAssign(assign) => self.eval_field_assign(assign),
            Expr::Await(await_expr) => self.eval_await(await_expr),
        }
    }

    /// Load an identifier and remember its declared type for `typeof`
    fn eval_ident(&mut self, id: &Ident) -> Result<Value, RuntimeError> {
        let var = self
            .env
            .get(&id.name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: id.name.clone(),
                span: id.span,
            })?;
        let value = var.value.clone();
        self.last_ident = Some((id.name.clone(), var.declared_type.clone()));
        Ok(value)
    }

    fn eval_binary(&mut self, binary: &BinaryExpr) -> Result<Value, RuntimeError> {
        // Logical operators short-circuit on truthiness
        if binary.op == BinaryOp::And {
            let left = self.eval_expr(&binary.left)?;
            if !left.is_truthy() {
                return Ok(Value::Bool(false));
            }
            let right = self.eval_expr(&binary.right)?;
            return Ok(Value::Bool(right.is_truthy()));
        }
        if binary.op == BinaryOp::Or {
            let left = self.eval_expr(&binary.left)?;
            if left.is_truthy() {
                return Ok(Value::Bool(true));
            }
            let right = self.eval_expr(&binary.right)?;
            return Ok(Value::Bool(right.is_truthy()));
        }

        let left = self.eval_expr(&binary.left)?;
        let right = self.eval_expr(&binary.right)?;
        self.binary_op(left, binary.op, right, binary.span)
    }

    /// Apply a binary operator: typed int and float fast paths, canonical
    /// string concatenation for `+` with non-uniform operands, canonical
    /// equality everywhere else
    fn binary_op(
        &self,
        left: Value,
        op: BinaryOp,
        right: Value,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        if let (Value::Int(l), Value::Int(r)) = (&left, &right) {
            let (l, r) = (*l, *r);
            return match op {
                BinaryOp::Add => Ok(Value::Int(l.wrapping_add(r))),
                BinaryOp::Sub => Ok(Value::Int(l.wrapping_sub(r))),
                BinaryOp::Mul => Ok(Value::Int(l.wrapping_mul(r))),
                BinaryOp::Div => {
                    if r == 0 {
                        Err(RuntimeError::DivideByZero { span })
                    } else {
                        Ok(Value::Int(l.wrapping_div(r)))
                    }
                }
                BinaryOp::Mod => {
                    if r == 0 {
                        Err(RuntimeError::DivideByZero { span })
                    } else {
                        Ok(Value::Int(l.wrapping_rem(r)))
                    }
                }
                BinaryOp::Lt => Ok(Value::Bool(l < r)),
                BinaryOp::Le => Ok(Value::Bool(l <= r)),
                BinaryOp::Gt => Ok(Value::Bool(l > r)),
                BinaryOp::Ge => Ok(Value::Bool(l >= r)),
                BinaryOp::Eq => Ok(Value::Bool(l == r)),
                BinaryOp::Ne => Ok(Value::Bool(l != r)),
                BinaryOp::And | BinaryOp::Or => unreachable!("handled before operand evaluation"),
            };
        }

        if let (Value::Float(l), Value::Float(r)) = (&left, &right) {
            let (l, r) = (*l, *r);
            return match op {
                BinaryOp::Add => Ok(Value::Float(l + r)),
                BinaryOp::Sub => Ok(Value::Float(l - r)),
                BinaryOp::Mul => Ok(Value::Float(l * r)),
                BinaryOp::Div => Ok(Value::Float(l / r)),
                BinaryOp::Mod => Err(RuntimeError::Kind {
                    msg: "operator '%' requires integers".to_string(),
                    span,
                }),
                BinaryOp::Lt => Ok(Value::Bool(l < r)),
                BinaryOp::Le => Ok(Value::Bool(l <= r)),
                BinaryOp::Gt => Ok(Value::Bool(l > r)),
                BinaryOp::Ge => Ok(Value::Bool(l >= r)),
                BinaryOp::Eq => Ok(Value::Bool(l == r)),
                BinaryOp::Ne => Ok(Value::Bool(l != r)),
                BinaryOp::And | BinaryOp::Or => unreachable!("handled before operand evaluation"),
            };
        }

        match op {
            // `+` outside the fast paths concatenates canonical forms
            BinaryOp::Add => Ok(Value::string(format!(
                "{}{}",
                left.canonical(),
                right.canonical()
            ))),
            BinaryOp::Eq => Ok(Value::Bool(left.canonical() == right.canonical())),
            BinaryOp::Ne => Ok(Value::Bool(left.canonical() != right.canonical())),
            _ => Err(RuntimeError::Kind {
                msg: format!(
                    "invalid operands for '{}': {} and {}",
                    op.as_str(),
                    left.type_name(),
                    right.type_name()
                ),
                span,
            }),
        }
    }

    fn eval_unary(&mut self, unary: &UnaryExpr) -> Result<Value, RuntimeError> {
        match unary.op {
            UnaryOp::Neg => {
                let operand = self.eval_expr(&unary.operand)?;
                match operand {
                    Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
                    Value::Float(n) => Ok(Value::Float(-n)),
                    other => Err(RuntimeError::Kind {
                        msg: format!("cannot negate {}", other.type_name()),
                        span: unary.span,
                    }),
                }
            }
            UnaryOp::Not => {
                let operand = self.eval_expr(&unary.operand)?;
                Ok(Value::Bool(!operand.is_truthy()))
            }
            UnaryOp::Typeof => {
                // Any stale identifier metadata must not leak into this typeof
                self.last_ident = None;
                let operand = self.eval_expr(&unary.operand)?;
                let meta = self.last_ident.take();
                Ok(Value::string(self.type_of(&operand, meta)))
            }
        }
    }

    /// The `typeof` report: the declared type of the last-loaded identifier
    /// when it is a registered custom type or agrees with the runtime value,
    /// otherwise the runtime type name
    fn type_of(&self, value: &Value, meta: Option<(String, TypeExpr)>) -> String {
        if let Some((_, declared)) = meta {
            if let TypeExpr::Name(name) = &declared {
                if self.types.contains(name) {
                    return name.clone();
                }
                let agrees = match (name.as_str(), value) {
                    ("int", Value::Int(_))
                    | ("float", Value::Float(_))
                    | ("string", Value::Str(_))
                    | ("bool", Value::Bool(_))
                    | ("object", Value::Object(_))
                    | ("function", Value::Function(_)) => true,
                    _ => false,
                };
                if agrees {
                    return name.clone();
                }
            }
            match (&declared, value) {
                (TypeExpr::Array(_), Value::Array(_))
                | (TypeExpr::Tuple(_), Value::Array(_))
                | (TypeExpr::Object(_), Value::Object(_)) => return declared.to_string(),
                _ => {}
            }
        }
        value.type_name().to_string()
    }

    /// Call resolution for identifier callees: program registry, then
    /// function registry, then the environment, then the builtin table
    fn eval_call(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        if let Expr::Ident(id) = call.callee.as_ref() {
            if let Some(prog) = self.programs.get(&id.name).cloned() {
                let args = self.eval_args(&call.args)?;
                return self.call_with_params(&id.name, &prog.params, &prog.body, args, call.span);
            }
            if let Some(func) = self.functions.get(&id.name).cloned() {
                let args = self.eval_args(&call.args)?;
                return self.call_with_params(&id.name, &func.params, &func.body, args, call.span);
            }
            if let Some(var) = self.env.get(&id.name) {
                let callee = var.value.clone();
                let args = self.eval_args(&call.args)?;
                return self.call_value(callee, args, call.span);
            }
            if let Some(builtin) = stdlib::lookup(&id.name) {
                let args = self.eval_args(&call.args)?;
                if id.name == "push" {
                    self.check_push_element(call, &args)?;
                }
                return builtin(&args, call.span, &self.output);
            }
            return Err(RuntimeError::UndefinedFunction {
                name: id.name.clone(),
                span: id.span,
            });
        }

        let callee = self.eval_expr(&call.callee)?;
        let args = self.eval_args(&call.args)?;
        self.call_value(callee, args, call.span)
    }

    fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Invoke a first-class function value
    pub(crate) fn call_value(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(FunctionRef::Decl(func)) => {
                let func = Rc::clone(&func);
                self.call_with_params(&func.name, &func.params, &func.body, args, span)
            }
            Value::Function(FunctionRef::Expr(func)) => {
                let func = Rc::clone(&func);
                self.call_with_params("<anonymous>", &func.params, &func.body, args, span)
            }
            other => Err(RuntimeError::Kind {
                msg: format!("value of type {} is not callable", other.type_name()),
                span,
            }),
        }
    }

    /// When pushing onto a named array declared `[T]`, the element must
    /// match `T`
    fn check_push_element(&self, call: &CallExpr, args: &[Value]) -> Result<(), RuntimeError> {
        if args.len() != 2 {
            return Ok(()); // arity reported by the builtin itself
        }
        if let Expr::Ident(target) = &call.args[0] {
            if let Some(element_ty) = self.declared_element_type(&target.name) {
                if !matches(&args[1], &element_ty, &self.types) {
                    return Err(RuntimeError::Type {
                        msg: format!(
                            "cannot push {} to array '{}' of element type '{}'",
                            args[1].type_name(),
                            target.name,
                            element_ty
                        ),
                        span: call.span,
                    });
                }
            }
        }
        Ok(())
    }

    fn eval_index(&mut self, index: &IndexExpr) -> Result<Value, RuntimeError> {
        let target = self.eval_expr(&index.target)?;
        let idx = self.eval_expr(&index.index)?;

        match target {
            Value::Array(arr) => {
                let i = self.want_index(&idx, index.span)?;
                let arr = arr.borrow();
                if i < 0 || i as usize >= arr.len() {
                    return Err(RuntimeError::IndexOutOfBounds {
                        msg: format!("array index {} out of bounds (len {})", i, arr.len()),
                        span: index.span,
                    });
                }
                Ok(arr[i as usize].clone())
            }
            Value::Object(obj) => {
                let key = match idx {
                    Value::Str(s) => s.as_ref().clone(),
                    other => other.canonical(),
                };
                // A missing key reads as the unit value
                Ok(obj.borrow().get(&key).cloned().unwrap_or_else(Value::unit))
            }
            Value::Str(s) => {
                let i = self.want_index(&idx, index.span)?;
                let chars: Vec<char> = s.chars().collect();
                if i < 0 || i as usize >= chars.len() {
                    return Err(RuntimeError::IndexOutOfBounds {
                        msg: format!("string index {} out of bounds (len {})", i, chars.len()),
                        span: index.span,
                    });
                }
                Ok(Value::string(chars[i as usize].to_string()))
            }
            other => Err(RuntimeError::Kind {
                msg: format!("cannot index {}", other.type_name()),
                span: index.span,
            }),
        }
    }

    fn want_index(&self, idx: &Value, span: Span) -> Result<i64, RuntimeError> {
        match idx {
            Value::Int(i) => Ok(*i),
            other => Err(RuntimeError::Kind {
                msg: format!("index must be an int, got {}", other.type_name()),
                span,
            }),
        }
    }

    fn eval_field(&mut self, field: &FieldExpr) -> Result<Value, RuntimeError> {
        let target = self.eval_expr(&field.target)?;
        match target {
            Value::Object(obj) => Ok(obj
                .borrow()
                .get(&field.field)
                .cloned()
                .unwrap_or_else(Value::unit)),
            other => Err(RuntimeError::Kind {
                msg: format!("field access requires an object, got {}", other.type_name()),
                span: field.span,
            }),
        }
    }

    fn eval_array_literal(&mut self, arr: &ArrayLit) -> Result<Value, RuntimeError> {
        let mut elements = Vec::with_capacity(arr.elements.len());
        for elem in &arr.elements {
            elements.push(self.eval_expr(elem)?);
        }
        Ok(Value::array(elements))
    }

    fn eval_object_literal(&mut self, obj: &ObjectLit) -> Result<Value, RuntimeError> {
        let mut fields = indexmap::IndexMap::with_capacity(obj.fields.len());
        for (key, value) in &obj.fields {
            let value = self.eval_expr(value)?;
            fields.insert(key.clone(), value);
        }
        Ok(Value::object(fields))
    }

    /// Name assignment: update the binding, then wake the reactive scheduler
    fn eval_assign(&mut self, assign: &AssignExpr) -> Result<Value, RuntimeError> {
        let value = self.eval_expr(&assign.value)?;
        self.env
            .set(&assign.name.name, value.clone(), &self.types, assign.span)?;
        let name = assign.name.name.clone();
        self.run_pending(Some(&name))?;
        Ok(value)
    }

    fn eval_index_assign(&mut self, assign: &IndexAssignExpr) -> Result<Value, RuntimeError> {
        let target = self.eval_expr(&assign.target)?;
        let idx = self.eval_expr(&assign.index)?;
        let value = self.eval_expr(&assign.value)?;

        match target {
            Value::Array(arr) => {
                let i = self.want_index(&idx, assign.span)?;
                {
                    let arr = arr.borrow();
                    if i < 0 || i as usize >= arr.len() {
                        return Err(RuntimeError::IndexOutOfBounds {
                            msg: format!("array index {} out of bounds (len {})", i, arr.len()),
                            span: assign.span,
                        });
                    }
                }
                // Element typing against the named array's declared `[T]`
                if let Expr::Ident(id) = assign.target.as_ref() {
                    if let Some(element_ty) = self.declared_element_type(&id.name) {
                        if !matches(&value, &element_ty, &self.types) {
                            return Err(RuntimeError::Type {
                                msg: format!(
                                    "cannot assign {} to array '{}' of element type '{}'",
                                    value.type_name(),
                                    id.name,
                                    element_ty
                                ),
                                span: assign.span,
                            });
                        }
                    }
                }
                arr.borrow_mut()[i as usize] = value;
                Ok(Value::unit())
            }
            Value::Object(obj) => {
                let key = match idx {
                    Value::Str(s) => s.as_ref().clone(),
                    other => {
                        return Err(RuntimeError::Kind {
                            msg: format!("object index must be a string, got {}", other.type_name()),
                            span: assign.span,
                        })
                    }
                };
                obj.borrow_mut().insert(key, value);
                Ok(Value::unit())
            }
            other => Err(RuntimeError::Kind {
                msg: format!("index assignment requires an array or object, got {}", other.type_name()),
                span: assign.span,
            }),
        }
    }

    fn eval_field_assign(&mut self, assign: &FieldAssignExpr) -> Result<Value, RuntimeError> {
        let target = self.eval_expr(&assign.target)?;
        let value = self.eval_expr(&assign.value)?;

        match target {
            Value::Object(obj) => {
                // When the target is a named variable with a structural
                // object type listing this field, the new value must match
                if let Expr::Ident(id) = assign.target.as_ref() {
                    if let Some(field_ty) = self.declared_field_type(&id.name, &assign.field) {
                        if !matches(&value, &field_ty, &self.types) {
                            return Err(RuntimeError::Type {
                                msg: format!(
                                    "cannot assign {} to field '{}' of '{}' declared '{}'",
                                    value.type_name(),
                                    assign.field,
                                    id.name,
                                    field_ty
                                ),
                                span: assign.span,
                            });
                        }
                    }
                }
                obj.borrow_mut().insert(assign.field.clone(), value);
                Ok(Value::unit())
            }
            other => Err(RuntimeError::Kind {
                msg: format!("field assignment requires an object, got {}", other.type_name()),
                span: assign.span,
            }),
        }
    }

    /// `await prog(args)`: run the program body against a snapshot of the
    /// caller's environment with the caller suspended, then restore the
    /// caller's environment. Awaiting anything else is plain evaluation.
    fn eval_await(&mut self, await_expr: &AwaitExpr) -> Result<Value, RuntimeError> {
        if let Expr::Call(call) = await_expr.expr.as_ref() {
            if let Expr::Ident(id) = call.callee.as_ref() {
                if let Some(prog) = self.programs.get(&id.name).cloned() {
                    // Arguments evaluate in the caller's environment
                    let args = self.eval_args(&call.args)?;
                    let snapshot = self.env.clone();
                    let saved = std::mem::replace(&mut self.env, snapshot);
                    let result =
                        self.call_with_params(&id.name, &prog.params, &prog.body, args, call.span);
                    self.env = saved;
                    return result;
                }
            }
        }
        self.eval_expr(&await_expr.expr)
    }
}
