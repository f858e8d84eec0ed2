use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use ahash::{HashMap, HashMapExt};
use once_cell::sync::Lazy;
use smartstring::alias::String;

static STATE: Lazy<RwLock<State>> = Lazy::new(|| RwLock::new(State::new()));
static TEMPORARY_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// An interned name, for example of a variable or a function.
/// Should be created using [`State::get_symbol`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&State::get_name(*self))
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&State::get_name(*self))
    }
}

impl Symbol {
    pub fn get_id(&self) -> u32 {
        self.0
    }
}

/// A global state, that stores mappings from variable and function names to ids.
pub struct State {
    str_to_id: HashMap<String, Symbol>,
    id_to_str: Vec<String>,
}

impl State {
    pub const E: Symbol = Symbol(0);
    pub const I: Symbol = Symbol(1);
    pub const PI: Symbol = Symbol(2);

    pub const BUILTIN_VAR_LIST: [&'static str; 3] = ["e", "i", "pi"];

    fn new() -> State {
        let mut state = State {
            str_to_id: HashMap::new(),
            id_to_str: vec![],
        };

        for x in Self::BUILTIN_VAR_LIST {
            state.get_symbol_impl(x);
        }

        state
    }

    /// Get the symbol for a certain name if the name is already registered,
    /// else register it and return a new symbol.
    pub fn get_symbol<S: AsRef<str>>(name: S) -> Symbol {
        if let Some(s) = STATE.read().unwrap().str_to_id.get(name.as_ref()) {
            return *s;
        }

        STATE.write().unwrap().get_symbol_impl(name.as_ref())
    }

    fn get_symbol_impl(&mut self, name: &str) -> Symbol {
        match self.str_to_id.entry(name.into()) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => {
                if self.id_to_str.len() == u32::MAX as usize - 1 {
                    panic!("Too many variables defined");
                }

                let new_symbol = Symbol(self.id_to_str.len() as u32);
                self.id_to_str.push(name.into());
                v.insert(new_symbol);
                new_symbol
            }
        }
    }

    /// Get the name of a symbol.
    pub fn get_name(id: Symbol) -> String {
        STATE.read().unwrap().id_to_str[id.0 as usize].clone()
    }

    /// Returns `true` iff this symbol is one of the reserved constants `e`, `i` and `pi`.
    pub fn is_builtin(id: Symbol) -> bool {
        id.0 < Self::BUILTIN_VAR_LIST.len() as u32
    }

    /// Get a fresh index for a temporary polynomial variable. Indices are never reused,
    /// so a new temporary can never clash with one that is still in use.
    pub fn new_temporary() -> usize {
        TEMPORARY_COUNTER.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod test {
    use super::State;

    #[test]
    fn interning() {
        let x = State::get_symbol("x");
        let x2 = State::get_symbol("x");
        let y = State::get_symbol("y");
        assert_eq!(x, x2);
        assert_ne!(x, y);
        assert_eq!(State::get_name(y).as_str(), "y");
    }

    #[test]
    fn builtins() {
        assert_eq!(State::get_symbol("pi"), State::PI);
        assert!(State::is_builtin(State::get_symbol("e")));
        assert!(!State::is_builtin(State::get_symbol("q")));
    }

    #[test]
    fn temporaries_are_fresh() {
        let a = State::new_temporary();
        let b = State::new_temporary();
        assert_ne!(a, b);
    }
}
