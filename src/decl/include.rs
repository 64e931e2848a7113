//! Mixin descriptor.
//!
//! Wraps one `include` argument together with the lexical context it was
//! written in. Identity resolution follows constant lookup: try the
//! including scope, then each enclosing scope outward, then the root; the
//! innermost hit wins and the walk is deterministic for a fixed module
//! index. Everything downstream of an unresolved identity is empty or
//! false, never an error: an include of a module the index has never seen
//! simply contributes nothing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::warn;

use crate::model::ModuleIndex;
use crate::namespace::Namespace;
use crate::scan::{self, MacroCall, MacroKind, ScanIndex};

#[derive(Debug, Clone)]
pub struct Include {
    context: Namespace,
    module_path: Namespace,
    private: bool,
    included: bool,
}

impl Include {
    pub fn new(context: Namespace, module_path: Namespace, private: bool, included: bool) -> Self {
        Include { context, module_path, private, included }
    }

    pub fn private(&self) -> bool {
        self.private
    }

    /// Whether this include call was itself authored inside a deferred
    /// block.
    pub fn deferred_origin(&self) -> bool {
        self.included
    }

    /// Resolves the referenced module against the index, walking the
    /// lexical scope chain outward from the including context.
    pub fn module_name(&self, modules: &dyn ModuleIndex) -> Option<Namespace> {
        if self.module_path.is_absolute() {
            return modules
                .exists(&self.module_path.to_string())
                .then(|| self.module_path.clone());
        }
        let mut scope = self.context.clone();
        loop {
            let candidate = &scope + &self.module_path;
            if modules.exists(&candidate.to_string()) {
                return Some(candidate);
            }
            if scope.is_root() {
                return None;
            }
            scope = scope.parent();
        }
    }

    /// Undeferred `include` calls authored directly in the resolved
    /// module's own body. These inclusion relationships flow into whatever
    /// consumes the mixin.
    pub fn nested_includes(
        &self,
        resolved: &Namespace,
        modules: &dyn ModuleIndex,
        cache: &mut ScanCache,
    ) -> Vec<MacroCall> {
        self.rescanned_calls(resolved, modules, cache, |call| {
            call.kind == MacroKind::Include && !call.included
        })
    }

    /// Invocations captured inside the resolved module's deferred block,
    /// the members it injects into consumers.
    pub fn block_calls(
        &self,
        resolved: &Namespace,
        modules: &dyn ModuleIndex,
        cache: &mut ScanCache,
    ) -> Vec<MacroCall> {
        self.rescanned_calls(resolved, modules, cache, |call| call.included)
    }

    fn rescanned_calls(
        &self,
        resolved: &Namespace,
        modules: &dyn ModuleIndex,
        cache: &mut ScanCache,
        keep: impl Fn(&MacroCall) -> bool,
    ) -> Vec<MacroCall> {
        let Some(index) = cache.scan_module(resolved, modules) else {
            return Vec::new();
        };
        index.calls_for(resolved).iter().filter(|call| keep(call)).cloned().collect()
    }
}

/// Re-scan cache, scoped to one top-level build. Mixins defined in the same
/// file share one parse.
#[derive(Debug, Default)]
pub struct ScanCache {
    by_path: HashMap<PathBuf, Rc<ScanIndex>>,
}

impl ScanCache {
    pub fn scan_module(
        &mut self,
        name: &Namespace,
        modules: &dyn ModuleIndex,
    ) -> Option<Rc<ScanIndex>> {
        let file = modules.source_of(&name.to_string())?;
        if let Some(index) = self.by_path.get(&file.path) {
            return Some(Rc::clone(index));
        }
        match scan::scan(&file.text) {
            Ok(index) => {
                let index = Rc::new(index);
                self.by_path.insert(file.path, Rc::clone(&index));
                Some(index)
            }
            Err(error) => {
                warn!(module = %name, path = %file.path.display(), %error, "cannot re-scan mixin source");
                None
            }
        }
    }
}
