/*!

Metavariable records and the process-wide metavariable registry (spec.md
§3 "Metavariable"/"Metavariable registry", §4.7, §6).

The registry is the one piece of genuinely global mutable state the engine
owns outside of term nodes themselves. We guard it with a `Mutex` behind a
`once_cell::sync::Lazy` the same way the teacher guards its one piece of
process-wide state, the bucket allocator (`mod2_lib::core::gc::storage_allocator`)
— not because this engine is meant to be used from multiple threads (spec.md
§5 is explicit that it is not), but so a single, unambiguous access
discipline exists for the one static in the crate.

*/

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Mutex;

use kernel_abs::{FreeIdSet, IString};
use once_cell::sync::Lazy;

use crate::core::binder::MBinder;
use crate::core::error::CoreError;
use crate::core::term::Term;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MetaName {
    User(IString),
    Internal(u64),
}

impl std::fmt::Display for MetaName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaName::User(s) => write!(f, "{s}"),
            MetaName::Internal(id) => write!(f, "?{id}"),
        }
    }
}

pub struct Metavariable {
    name: MetaName,
    ty: Term,
    arity: usize,
    value: std::cell::RefCell<Option<MBinder>>,
}

pub type MetaPtr = Rc<Metavariable>;

impl Metavariable {
    #[inline(always)]
    pub fn name(&self) -> MetaName {
        self.name
    }

    pub fn display_name(&self) -> String {
        self.name.to_string()
    }

    #[inline(always)]
    pub fn ty(&self) -> &Term {
        &self.ty
    }

    #[inline(always)]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The current value, if instantiated.
    pub fn value(&self) -> Option<MBinder> {
        self.value.borrow().clone()
    }

    /// Whether the meta is still uninstantiated.
    pub fn unset(&self) -> bool {
        self.value.borrow().is_none()
    }
}

/// Key used to look a metavariable up in the registry: either its
/// user-assigned name or its internally-allocated id.
#[derive(Clone, Copy)]
pub enum MetaKey<'a> {
    Name(&'a str),
    Id(u64),
}

#[derive(Default)]
pub struct MetaStore {
    by_name: HashMap<IString, MetaPtr>,
    by_id: HashMap<u64, MetaPtr>,
    free_ids: FreeIdSet,
}

impl MetaStore {
    fn new_user_meta(&mut self, name: IString, ty: Term, arity: usize) -> Result<MetaPtr, CoreError> {
        if self.by_name.contains_key(&name) {
            return Err(CoreError::MetaNameExists(name.to_string()));
        }
        let meta = Rc::new(Metavariable {
            name: MetaName::User(name),
            ty,
            arity,
            value: std::cell::RefCell::new(None),
        });
        self.by_name.insert(name, meta.clone());
        Ok(meta)
    }

    fn new_internal_meta(&mut self, ty: Term, arity: usize) -> MetaPtr {
        let id = self.free_ids.allocate();
        let meta = Rc::new(Metavariable {
            name: MetaName::Internal(id),
            ty,
            arity,
            value: std::cell::RefCell::new(None),
        });
        self.by_id.insert(id, meta.clone());
        meta
    }

    fn find(&self, key: MetaKey) -> Option<MetaPtr> {
        match key {
            MetaKey::Name(n) => self.by_name.get(&kernel_abs::intern(n)).cloned(),
            MetaKey::Id(id) => self.by_id.get(&id).cloned(),
        }
    }
}

static REGISTRY: Lazy<Mutex<MetaStore>> = Lazy::new(|| Mutex::new(MetaStore::default()));

pub fn new_user_meta(name: impl AsRef<str>, ty: Term, arity: usize) -> Result<MetaPtr, CoreError> {
    REGISTRY
        .lock()
        .unwrap()
        .new_user_meta(kernel_abs::intern(name), ty, arity)
}

pub fn new_internal_meta(ty: Term, arity: usize) -> MetaPtr {
    REGISTRY.lock().unwrap().new_internal_meta(ty, arity)
}

pub fn find(key: MetaKey) -> Option<MetaPtr> {
    REGISTRY.lock().unwrap().find(key)
}

pub fn exists(key: MetaKey) -> bool {
    find(key).is_some()
}

/// Instantiates `m` with `body` of arity `m.arity()`. Fails if already
/// instantiated (spec.md §4.7, §7).
pub fn instantiate(m: &MetaPtr, body: MBinder) -> Result<(), CoreError> {
    debug_assert_eq!(body.arity(), m.arity, "instantiate: arity mismatch");
    let mut slot = m.value.borrow_mut();
    if slot.is_some() {
        return Err(CoreError::MetaAlreadyInstantiated);
    }
    *slot = Some(body);
    Ok(())
}

/// Whether `m` appears anywhere in `t`, walking under binders by opening
/// them once and not descending into other metavariables' stored values
/// (spec.md §6).
pub fn occurs(m: &MetaPtr, t: &Term) -> bool {
    match t {
        Term::Vari(_) | Term::Type | Term::Kind | Term::Symb(_) => false,
        Term::Prod(a, b) | Term::Abst(a, b) => {
            occurs(m, a) || {
                let (_x, body) = b.open();
                occurs(m, &body)
            }
        }
        Term::Appl(f, a) => occurs(m, f) || occurs(m, a),
        Term::Meta(h, env) => Rc::ptr_eq(h, m) || env.iter().any(|e| occurs(m, e)),
        Term::Patt(_, _, _) => false,
        Term::TEnv(_, env) => env.iter().any(|e| occurs(m, e)),
    }
}
