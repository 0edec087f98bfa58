//! The tech-file `compose` section client: parses `compose`/`paint`/
//! `erase`/`lock` directives into a [`CompositionTables`] (`spec.md` §4.2,
//! §6.2).

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use techfile::{Args, SectionClient};
use tiles::prelude::{PlaneId, TileType};

use crate::table::CompositionTables;

/// Resolves the type and plane names used in `compose` directives. A
/// separate `types`/`planes` section (outside this crate's scope) is
/// expected to have already populated these maps by the time the
/// `compose` section is read — enforced by registering this client with
/// the appropriate prerequisite mask.
pub struct NameResolver {
    /// Type name -> id.
    pub types: IndexMap<String, TileType>,
    /// Plane name -> id.
    pub planes: IndexMap<String, PlaneId>,
}

/// The `compose` section client.
pub struct ComposeClient {
    tables: Rc<RefCell<CompositionTables>>,
    names: Rc<RefCell<NameResolver>>,
}

impl ComposeClient {
    /// Creates a client that writes into `tables`, resolving names via
    /// `names`.
    pub fn new(tables: Rc<RefCell<CompositionTables>>, names: Rc<RefCell<NameResolver>>) -> Self {
        Self { tables, names }
    }

    fn resolve_type(&self, name: &str) -> Option<TileType> {
        self.names.borrow().types.get(name).copied()
    }

    fn resolve_plane(&self, name: &str) -> Option<PlaneId> {
        self.names.borrow().planes.get(name).copied()
    }
}

impl SectionClient for ComposeClient {
    fn line(&mut self, args: Args<'_>) -> bool {
        match args {
            ["compose", t, "=", a, b] => {
                let (Some(t), Some(a), Some(b)) =
                    (self.resolve_type(t), self.resolve_type(a), self.resolve_type(b))
                else {
                    return false;
                };
                let mut tables = self.tables.borrow_mut();
                let union = tables.plane_mask_of(a) | tables.plane_mask_of(b);
                tables.declare_type(t, union);
                true
            }
            ["paint", t1, t2, tres] => {
                let (Some(t1), Some(t2), Some(tres)) = (
                    self.resolve_type(t1),
                    self.resolve_type(t2),
                    self.resolve_type(tres),
                ) else {
                    return false;
                };
                let tables = self.tables.borrow();
                let planes = tables.plane_mask_of(t1) | tables.plane_mask_of(t2);
                drop(tables);
                let mut tables = self.tables.borrow_mut();
                for plane in planes.iter() {
                    tables.set_paint_rule(plane, t1, t2, tres);
                }
                true
            }
            ["paint", t1, t2, tres, plane] => {
                let (Some(t1), Some(t2), Some(tres), Some(plane)) = (
                    self.resolve_type(t1),
                    self.resolve_type(t2),
                    self.resolve_type(tres),
                    self.resolve_plane(plane),
                ) else {
                    return false;
                };
                self.tables.borrow_mut().set_paint_rule(plane, t1, t2, tres);
                true
            }
            ["erase", t1, t2, tres] => {
                let (Some(t1), Some(t2), Some(tres)) = (
                    self.resolve_type(t1),
                    self.resolve_type(t2),
                    self.resolve_type(tres),
                ) else {
                    return false;
                };
                let tables = self.tables.borrow();
                let planes = tables.plane_mask_of(t1) | tables.plane_mask_of(t2);
                drop(tables);
                let mut tables = self.tables.borrow_mut();
                for plane in planes.iter() {
                    tables.set_erase_rule(plane, t1, t2, tres);
                }
                true
            }
            ["erase", t1, t2, tres, plane] => {
                let (Some(t1), Some(t2), Some(tres), Some(plane)) = (
                    self.resolve_type(t1),
                    self.resolve_type(t2),
                    self.resolve_type(tres),
                    self.resolve_plane(plane),
                ) else {
                    return false;
                };
                self.tables.borrow_mut().set_erase_rule(plane, t1, t2, tres);
                true
            }
            ["lock", t] => {
                let Some(t) = self.resolve_type(t) else {
                    return false;
                };
                self.tables.borrow_mut().contacts_mut().lock(t);
                true
            }
            _ => false,
        }
    }

    fn finish(&mut self) {
        self.tables.borrow_mut().apply_defaults();
        let violations = self.tables.borrow().check_invariant();
        for (plane, have, arg) in violations {
            tracing::warn!(
                ?plane,
                ?have,
                ?arg,
                "paint/erase result violates the post-final composition invariant"
            );
        }
    }
}
