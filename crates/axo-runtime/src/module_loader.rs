//! Module loading
//!
//! Modules are identified by absolute resolved path. `.axo` modules parse
//! and execute once per interpretation (the visited set is marked before
//! recursion, which also breaks import cycles); each holds a named-export
//! table and an optional default export. `.json` imports bind the file's
//! text as a string. `use` loads a module in isolation, restoring the
//! caller's environment afterwards.

use crate::ast::{ExportDecl, ExportKind, ImportDecl, Item, Stmt, UseDecl};
use crate::environment::Variable;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::span::Span;
use crate::types::TypeExpr;
use crate::value::{FunctionRef, RuntimeError, Value};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// One loaded module's export tables
#[derive(Debug, Clone, Default)]
pub struct Module {
    /// Named exports
    pub named: HashMap<String, Value>,
    /// Default export slot
    pub default: Option<Value>,
}

/// Loader state carried by the interpreter
#[derive(Debug, Clone)]
pub struct ModuleSet {
    /// Export tables by absolute resolved path
    pub modules: HashMap<PathBuf, Module>,
    /// Paths already loaded (or currently loading); grows monotonically
    pub visited: HashSet<PathBuf>,
    /// Stack of modules currently executing, for relative resolution and
    /// export routing
    pub executing: Vec<PathBuf>,
    /// Directory imports resolve against for the entry module
    pub entry_dir: PathBuf,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
            visited: HashSet::new(),
            executing: Vec::new(),
            entry_dir: PathBuf::from("."),
        }
    }

    /// Directory the next import resolves against
    fn base_dir(&self) -> PathBuf {
        self.executing
            .last()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.entry_dir.clone())
    }

    /// Resolve a requested path. With an extension it must be `.axo` or
    /// `.json`; without one, `<path>.axo` is tried first, then
    /// `<path>/index.axo`. Not-found is fatal.
    pub fn resolve(&self, request: &str, span: Span) -> Result<PathBuf, RuntimeError> {
        let base = self.base_dir();
        let requested = Path::new(request);

        let candidate = if let Some(ext) = requested.extension() {
            if ext != "axo" && ext != "json" {
                return Err(RuntimeError::Kind {
                    msg: format!("unsupported module extension in '{}'", request),
                    span,
                });
            }
            base.join(requested)
        } else {
            let with_ext = base.join(format!("{}.axo", request));
            if with_ext.exists() {
                with_ext
            } else {
                base.join(requested).join("index.axo")
            }
        };

        if !candidate.exists() {
            return Err(RuntimeError::Io {
                msg: format!("module not found: '{}'", request),
                span,
            });
        }

        candidate.canonicalize().map_err(|e| RuntimeError::Io {
            msg: format!("could not resolve '{}': {}", request, e),
            span,
        })
    }
}

impl Default for ModuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// `import` declaration: load the module and copy the requested
    /// bindings into the caller's environment
    pub(crate) fn eval_import(&mut self, decl: &ImportDecl) -> Result<Value, RuntimeError> {
        let path = self.modules.resolve(&decl.path, decl.span)?;

        // `.json` imports bind the raw text as a string named after the stem
        if path.extension().is_some_and(|ext| ext == "json") {
            let content = std::fs::read_to_string(&path).map_err(|e| RuntimeError::Io {
                msg: format!("could not read '{}': {}", path.display(), e),
                span: decl.span,
            })?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.env.define(
                stem,
                Variable::new(Value::string(content), TypeExpr::name("string"), false),
            );
            return Ok(Value::unit());
        }

        self.load_module(&path, decl.span)?;

        let module = self
            .modules
            .modules
            .get(&path)
            .cloned()
            .unwrap_or_default();

        if let Some(binding) = &decl.default_binding {
            let value = module.default.clone().ok_or_else(|| RuntimeError::Kind {
                msg: format!("module '{}' has no default export", decl.path),
                span: decl.span,
            })?;
            self.env
                .define(binding.clone(), Variable::new(value, TypeExpr::any(), false));
        }

        for name in &decl.named {
            let value = module
                .named
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::Kind {
                    msg: format!("module '{}' does not export '{}'", decl.path, name),
                    span: decl.span,
                })?;
            self.env
                .define(name.clone(), Variable::new(value, TypeExpr::any(), false));
        }

        Ok(Value::unit())
    }

    /// `use` declaration: isolated loading; the caller's environment is
    /// restored after the module executes and nothing is copied in
    pub(crate) fn eval_use(&mut self, decl: &UseDecl) -> Result<Value, RuntimeError> {
        let path = self.modules.resolve(&decl.path, decl.span)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            return Err(RuntimeError::Kind {
                msg: format!("use requires an .axo module, got '{}'", decl.path),
                span: decl.span,
            });
        }

        let saved = self.env.clone();
        let result = self.load_module(&path, decl.span);
        self.env = saved;
        result.map(|_| Value::unit())
    }

    /// Parse and execute a module once; subsequent loads of the same
    /// resolved path are no-ops
    pub(crate) fn load_module(&mut self, path: &Path, span: Span) -> Result<(), RuntimeError> {
        if self.modules.visited.contains(path) {
            return Ok(());
        }
        // Marked before recursion: an import cycle finds the entry and stops
        self.modules.visited.insert(path.to_path_buf());
        self.modules
            .modules
            .insert(path.to_path_buf(), Module::default());

        let source = std::fs::read_to_string(path).map_err(|e| RuntimeError::Io {
            msg: format!("could not read module '{}': {}", path.display(), e),
            span,
        })?;

        let tokens = Lexer::new(&source).tokenize();
        let program = Parser::new(tokens).parse().map_err(|e| RuntimeError::Kind {
            msg: format!("in module '{}': {}", path.display(), e),
            span: e.span(),
        })?;

        self.modules.executing.push(path.to_path_buf());
        self.env.push_scope();
        let result = self.run_items(&program.items);
        self.env.pop_scope();
        self.modules.executing.pop();

        result.map(|_| ())
    }

    /// `export` declaration: process the declaration, then record it in the
    /// current module's export tables
    pub(crate) fn eval_export(&mut self, decl: &ExportDecl) -> Result<Value, RuntimeError> {
        match &decl.kind {
            ExportKind::Decl(item) => {
                let export = self.process_exportable(item, decl.span)?;
                if let Some((name, value)) = export {
                    self.record_named_export(name, value);
                }
            }
            ExportKind::Default(item) => {
                let export = self.process_exportable(item, decl.span)?;
                if let Some((name, value)) = export {
                    self.record_named_export(name, value.clone());
                    self.record_default_export(value);
                }
            }
            ExportKind::Named(names) => {
                for name in names {
                    let value = self
                        .env
                        .get(name)
                        .map(|var| var.value.clone())
                        .ok_or_else(|| RuntimeError::UndefinedVariable {
                            name: name.clone(),
                            span: decl.span,
                        })?;
                    self.record_named_export(name.clone(), value);
                }
            }
        }
        Ok(Value::unit())
    }

    /// Evaluate an exported declaration and return its exportable binding,
    /// if it produces one (type aliases and programs register themselves
    /// but export no value)
    fn process_exportable(
        &mut self,
        item: &Item,
        _span: Span,
    ) -> Result<Option<(String, Value)>, RuntimeError> {
        match item {
            Item::Function(func) => {
                self.register_function(func);
                Ok(Some((
                    func.name.clone(),
                    Value::Function(FunctionRef::Decl(std::rc::Rc::clone(func))),
                )))
            }
            Item::Program(prog) => {
                self.register_program(prog);
                Ok(None)
            }
            Item::TypeAlias(alias) => {
                self.types.define(alias.name.clone(), alias.ty.clone());
                Ok(None)
            }
            Item::Statement(Stmt::VarDecl(var)) => {
                self.eval_statement(&Stmt::VarDecl(var.clone()))?;
                let value = self
                    .env
                    .get(&var.name)
                    .map(|v| v.value.clone())
                    .unwrap_or_else(Value::unit);
                Ok(Some((var.name.clone(), value)))
            }
            other => {
                self.eval_item(other)?;
                Ok(None)
            }
        }
    }

    fn record_named_export(&mut self, name: String, value: Value) {
        if let Some(path) = self.modules.executing.last().cloned() {
            if let Some(module) = self.modules.modules.get_mut(&path) {
                module.named.insert(name, value);
            }
        }
    }

    fn record_default_export(&mut self, value: Value) {
        if let Some(path) = self.modules.executing.last().cloned() {
            if let Some(module) = self.modules.modules.get_mut(&path) {
                module.default = Some(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_other_extensions() {
        let set = ModuleSet::new();
        let err = set.resolve("data.txt", Span::dummy()).unwrap_err();
        assert!(matches!(err, RuntimeError::Kind { .. }));
    }

    #[test]
    fn test_resolve_missing_is_fatal() {
        let set = ModuleSet::new();
        let err = set.resolve("no_such_module", Span::dummy()).unwrap_err();
        assert!(matches!(err, RuntimeError::Io { .. }));
    }
}
