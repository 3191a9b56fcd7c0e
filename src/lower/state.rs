//! Per-module lowering state: the runtime symbol cache and the
//! string-constant interner.
//!
//! One instance exists per module being lowered, owned by the pass and
//! threaded through every lowering call. Never shared across modules,
//! never accessed concurrently.

use std::collections::HashMap;

use crate::ir::{GlobalStr, Module, RuntimeDecl, Signature};

#[derive(Debug, Default)]
pub struct ModuleLoweringState {
    decls: Vec<RuntimeDecl>,
    by_name: HashMap<String, usize>,
    globals: Vec<GlobalStr>,
    next_id: u32,
}

impl ModuleLoweringState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a runtime symbol by name, declaring it on first use.
    ///
    /// Call sites agree on the signature for a given name by construction
    /// (all signatures come from `lower::runtime`), so a cache hit does
    /// not re-validate it. Idempotent: N calls leave one declaration.
    pub fn get_or_declare(&mut self, name: &str, sig: impl FnOnce() -> Signature) -> &RuntimeDecl {
        let index = match self.by_name.get(name) {
            Some(&index) => index,
            None => {
                let index = self.decls.len();
                self.decls.push(RuntimeDecl {
                    name: name.to_string(),
                    sig: sig(),
                });
                self.by_name.insert(name.to_string(), index);
                index
            }
        };
        &self.decls[index]
    }

    /// Materialize a null-terminated global byte constant for `text`,
    /// returning its unique name. Each call produces an independent
    /// constant even for identical text.
    pub fn intern(&mut self, prefix: &str, text: &str) -> String {
        let mut bytes = text.as_bytes().to_vec();
        if bytes.last() != Some(&0) {
            bytes.push(0);
        }
        let name = format!("{}{}", prefix, self.next_id);
        self.next_id += 1;
        self.globals.push(GlobalStr {
            name: name.clone(),
            bytes,
        });
        name
    }

    /// Install the collected declarations and constants into the module.
    /// Declarations go to the very start of the module's top-level scope,
    /// in first-use order.
    pub fn finish(self, module: &mut Module) {
        module.decls.splice(0..0, self.decls);
        module.globals.extend(self.globals);
    }

    #[cfg(test)]
    pub(crate) fn decls(&self) -> &[RuntimeDecl] {
        &self.decls
    }

    #[cfg(test)]
    pub(crate) fn globals(&self) -> &[GlobalStr] {
        &self.globals
    }
}
