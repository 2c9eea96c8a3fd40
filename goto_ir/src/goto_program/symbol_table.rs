// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use super::Symbol;
use crate::{InternedString, MachineModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// This is a typesafe implementation of the CBMC symbol table, based on the CBMC code at:
/// <https://github.com/diffblue/cbmc/blob/develop/src/util/symbol_table.h>
/// The passes only ever read it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    symbol_table: BTreeMap<InternedString, Symbol>,
    machine_model: MachineModel,
}

/// Constructors
impl SymbolTable {
    pub fn new(machine_model: MachineModel) -> SymbolTable {
        SymbolTable { symbol_table: BTreeMap::new(), machine_model }
    }
}

/// Setters
impl SymbolTable {
    /// Insert the element into the table. Errors if element already exists.
    pub fn insert(&mut self, symbol: Symbol) {
        let name = symbol.name;
        let old = self.symbol_table.insert(name, symbol);
        assert!(old.is_none(), "Symbol {name} inserted twice");
    }
}

/// Getters
impl SymbolTable {
    pub fn contains<T: Into<InternedString>>(&self, name: T) -> bool {
        self.symbol_table.contains_key(&name.into())
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, InternedString, Symbol> {
        self.symbol_table.iter()
    }

    pub fn len(&self) -> usize {
        self.symbol_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_table.is_empty()
    }

    pub fn lookup<T: Into<InternedString>>(&self, name: T) -> Option<&Symbol> {
        let name = name.into();
        self.symbol_table.get(&name)
    }

    pub fn machine_model(&self) -> &MachineModel {
        &self.machine_model
    }
}
