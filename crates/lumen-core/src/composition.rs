use compact_str::CompactString;
use smallvec::SmallVec;
use tracing::debug;

use crate::geometry::Size;
use crate::model::{Registry, Resolved};

/// Reserved widget name that inserts an expanding filler
pub const STRETCH: &str = "stretch";

/// Direction the panel lays its children out in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl LayoutDirection {
    /// Map the `Direction` config index; unknown values fall back to left-to-right
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => Self::RightToLeft,
            2 => Self::TopToBottom,
            3 => Self::BottomToTop,
            _ => Self::LeftToRight,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::TopToBottom | Self::BottomToTop)
    }

    pub fn is_reversed(&self) -> bool {
        matches!(self, Self::RightToLeft | Self::BottomToTop)
    }
}

/// The row/column a panel places its widgets in
pub trait PanelContainer {
    type Widget;

    fn set_direction(&mut self, direction: LayoutDirection);

    /// Take visual ownership of `widget` and append it
    fn append_widget(&mut self, widget: Self::Widget);

    fn append_stretch(&mut self);

    /// Detach every child without destroying it; widgets stay owned by the registry
    fn detach_all(&mut self);

    /// Size the container to the panel and clamp it there
    fn fit(&mut self, size: Size);
}

/// One slot of a composed panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEntry {
    Stretch,
    Widget(CompactString),
}

pub type Layout = SmallVec<[LayoutEntry; 8]>;

/// Fill `container` from the ordered widget names.
///
/// Names that are missing or not visual are skipped without touching the
/// container, so the remaining entries keep their declared relative order.
pub fn compose<C: PanelContainer>(
    names: &[String],
    direction: LayoutDirection,
    registry: &Registry<C::Widget>,
    container: &mut C,
) -> Layout {
    container.set_direction(direction);

    let mut layout = Layout::new();
    for name in names {
        if name == STRETCH {
            container.append_stretch();
            layout.push(LayoutEntry::Stretch);
            continue;
        }

        match registry.resolve(name) {
            Resolved::Visual(widget) => {
                debug!("Adding widget {:?}", name);
                container.append_widget(widget);
                layout.push(LayoutEntry::Widget(name.as_str().into()));
            }
            Resolved::NotVisual => debug!("Model {:?} has no visual surface, skipping", name),
            Resolved::Busy => debug!("Model {:?} is busy, skipping", name),
            Resolved::Missing => debug!("No model named {:?}, skipping", name),
        }
    }
    layout
}
