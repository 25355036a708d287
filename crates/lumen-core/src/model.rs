use ahash::AHashMap;
use compact_str::CompactString;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::config::{ConfigGroup, ShellConfig};
use crate::desktop::DesktopSurface;
use crate::geometry::Rect;

/// A shell component addressable by name and configurable from a group.
///
/// `W` is the toolkit's widget handle. Models that can be placed inside a
/// panel return one from [`Model::widget`]; top-level models return `None`.
pub trait Model<W> {
    fn name(&self) -> &str;

    /// Apply the model's config group
    fn load(&mut self, group: &ConfigGroup, ctx: &LoadContext<'_, W>);

    /// Visual handle for embedding in a panel
    fn widget(&self) -> Option<W> {
        None
    }
}

/// Shared handle to a registered model
pub type SharedModel<W> = Rc<RefCell<dyn Model<W>>>;

/// What a model sees while loading: the registry and the current available area
pub struct LoadContext<'a, W> {
    pub registry: &'a Registry<W>,
    pub area: Rect,
}

/// Outcome of looking a name up for embedding
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<W> {
    Visual(W),
    /// Registered, but has no visual surface
    NotVisual,
    /// Registered, but currently borrowed (a model resolving itself)
    Busy,
    Missing,
}

/// Name-keyed owner of every model in the shell
pub struct Registry<W> {
    models: AHashMap<CompactString, SharedModel<W>>,
    /// Registration order, used for loading and reverse teardown
    order: Vec<CompactString>,
    desktop: Option<Rc<RefCell<DesktopSurface>>>,
}

impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self {
            models: AHashMap::new(),
            order: Vec::new(),
            desktop: None,
        }
    }
}

impl<W> Registry<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its own name. The first registration of a name wins.
    pub fn register(&mut self, model: SharedModel<W>) -> bool {
        let name: CompactString = model.borrow().name().into();
        if self.models.contains_key(&name) {
            warn!("Model {:?} is already registered, ignoring duplicate", name);
            return false;
        }
        debug!("Registered model {:?}", name);
        self.order.push(name.clone());
        self.models.insert(name, model);
        true
    }

    /// Register the desktop surface; it also becomes the blur sampling source
    pub fn register_desktop(&mut self, desktop: Rc<RefCell<DesktopSurface>>) -> bool
    where
        W: 'static,
    {
        let shared: SharedModel<W> = desktop.clone();
        let registered = self.register(shared);
        if registered && self.desktop.is_none() {
            self.desktop = Some(desktop);
        }
        registered
    }

    pub fn get_model_by_name(&self, name: &str) -> Option<SharedModel<W>> {
        self.models.get(name).cloned()
    }

    pub fn desktop(&self) -> Option<Rc<RefCell<DesktopSurface>>> {
        self.desktop.clone()
    }

    /// Resolve a name to a visual handle. Failure is a normal outcome.
    pub fn resolve(&self, name: &str) -> Resolved<W> {
        let Some(model) = self.models.get(name) else {
            return Resolved::Missing;
        };
        let Ok(model) = model.try_borrow() else {
            return Resolved::Busy;
        };
        match model.widget() {
            Some(widget) => Resolved::Visual(widget),
            None => Resolved::NotVisual,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Run `load` on every registered model that has a group in `config`,
    /// in registration order
    pub fn load_all(&self, config: &ShellConfig, area: Rect) {
        let ctx = LoadContext { registry: self, area };
        for name in &self.order {
            let Some(group) = config.group(name) else {
                continue;
            };
            let Some(model) = self.models.get(name) else {
                continue;
            };
            match model.try_borrow_mut() {
                Ok(mut model) => model.load(group, &ctx),
                Err(_) => warn!("Model {:?} is busy, skipping load", name),
            }
        }
    }

    /// Drop every model, most recently registered first
    pub fn clear(&mut self) {
        self.desktop = None;
        while let Some(name) = self.order.pop() {
            self.models.remove(&name);
        }
    }
}
