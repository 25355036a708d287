use compact_str::CompactString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::ConfigGroup;
use crate::error::DesktopError;
use crate::geometry::{Rect, Size};
use crate::image::Image;
use crate::model::{LoadContext, Model};

/// Decodes background files into images
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<Image, DesktopError>;
}

/// Desktop background surface.
///
/// Holds the decoded background and a copy scaled to the available area,
/// which panels sample for their blurred backgrounds.
pub struct DesktopSurface {
    name: CompactString,
    file_name: Option<PathBuf>,
    source: Option<Image>,
    rendered: Option<Image>,
    area: Option<Size>,
    /// Bumped whenever the rendered image changes
    generation: u64,
    loader: Option<Box<dyn ImageLoader>>,
}

impl DesktopSurface {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            source: None,
            rendered: None,
            area: None,
            generation: 0,
            loader: None,
        }
    }

    /// Loader used when the background comes from the config group
    pub fn with_loader(mut self, loader: Box<dyn ImageLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// The image as currently rendered on screen
    pub fn image(&self) -> Option<&Image> {
        self.rendered.as_ref().or(self.source.as_ref())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the background. On failure the previous image and path stay in place.
    pub fn set_background(
        &mut self,
        path: impl AsRef<Path>,
        loader: &dyn ImageLoader,
    ) -> Result<(), DesktopError> {
        let path = path.as_ref();
        let image = loader.load(path)?;
        if image.is_empty() {
            return Err(DesktopError::EmptyImage(path.to_path_buf()));
        }

        info!("Desktop background set to {:?}", path);
        self.file_name = Some(path.to_path_buf());
        self.source = Some(image);
        self.render();
        Ok(())
    }

    /// React to a new available area by re-scaling the background
    pub fn geometry_changed(&mut self, area: Rect) {
        let size = area.size();
        if self.area == Some(size) {
            return;
        }
        debug!("Desktop area changed to {}x{}", size.width, size.height);
        self.area = Some(size);
        self.render();
    }

    fn render(&mut self) {
        self.rendered = match (&self.source, self.area) {
            (Some(source), Some(size)) => source.scaled(size),
            _ => None,
        };
        self.generation += 1;
    }
}

impl<W> Model<W> for DesktopSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&mut self, group: &ConfigGroup, ctx: &LoadContext<'_, W>) {
        self.geometry_changed(ctx.area);

        let background = group.read_string("Background", "");
        if background.is_empty() {
            return;
        }
        if self.source.is_some() && self.file_name.as_deref() == Some(Path::new(&background)) {
            debug!("Desktop {:?} background unchanged", self.name);
            return;
        }
        let Some(loader) = self.loader.take() else {
            warn!("Desktop {:?} has no image loader, ignoring Background", self.name);
            return;
        };
        if let Err(e) = self.set_background(&background, loader.as_ref()) {
            warn!("{}", e);
        }
        self.loader = Some(loader);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::Registry;

    /// Loader that returns a fixed image, or fails for paths containing "missing"
    pub(crate) struct StaticLoader {
        image: Image,
    }

    impl StaticLoader {
        pub fn new(image: Image) -> Self {
            Self { image }
        }
    }

    impl ImageLoader for StaticLoader {
        fn load(&self, path: &Path) -> Result<Image, DesktopError> {
            if path.to_string_lossy().contains("missing") {
                return Err(DesktopError::ImageLoad {
                    path: path.to_path_buf(),
                    reason: "no such file".into(),
                });
            }
            Ok(self.image.clone())
        }
    }

    pub(crate) fn desktop_with(image: Image) -> DesktopSurface {
        let mut desktop = DesktopSurface::new("desktop");
        desktop
            .set_background("/wallpaper.png", &StaticLoader::new(image))
            .unwrap();
        desktop
    }

    #[test]
    fn test_failed_load_keeps_previous() {
        let mut desktop = desktop_with(Image::filled(4, 4, 0xFF112233));
        let generation = desktop.generation();

        let loader = StaticLoader::new(Image::filled(1, 1, 0));
        assert!(desktop.set_background("/missing.png", &loader).is_err());
        assert_eq!(desktop.file_name(), Some(Path::new("/wallpaper.png")));
        assert_eq!(desktop.image().unwrap().pixel(0, 0), Some(0xFF112233));
        assert_eq!(desktop.generation(), generation);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let mut desktop = DesktopSurface::new("desktop");
        let loader = StaticLoader::new(Image::filled(0, 0, 0));
        assert!(matches!(
            desktop.set_background("/blank.png", &loader),
            Err(DesktopError::EmptyImage(_))
        ));
        assert!(desktop.file_name().is_none());
    }

    #[test]
    fn test_geometry_change_rescales_once() {
        let mut desktop = desktop_with(Image::filled(4, 4, 0xFF000000));
        desktop.geometry_changed(Rect::new(0, 0, 16, 9));
        let generation = desktop.generation();
        assert_eq!(desktop.image().unwrap().size(), Size::new(16, 9));

        desktop.geometry_changed(Rect::new(0, 0, 16, 9));
        assert_eq!(desktop.generation(), generation);
    }

    #[test]
    fn test_load_from_group() {
        let registry: Registry<()> = Registry::new();
        let ctx = LoadContext { registry: &registry, area: Rect::new(0, 0, 8, 8) };
        let mut desktop = DesktopSurface::new("desktop")
            .with_loader(Box::new(StaticLoader::new(Image::filled(2, 2, 0xFFABCDEF))));

        let group = ConfigGroup::new().with("Background", "/usr/share/backgrounds/a.png");
        Model::<()>::load(&mut desktop, &group, &ctx);

        assert_eq!(desktop.file_name(), Some(Path::new("/usr/share/backgrounds/a.png")));
        assert_eq!(desktop.image().unwrap().size(), Size::new(8, 8));
    }

    #[test]
    fn test_reload_decodes_only_a_changed_background() {
        let registry: Registry<()> = Registry::new();
        let ctx = LoadContext { registry: &registry, area: Rect::new(0, 0, 8, 8) };
        let mut desktop = DesktopSurface::new("desktop")
            .with_loader(Box::new(StaticLoader::new(Image::filled(2, 2, 0xFFABCDEF))));

        let group = ConfigGroup::new().with("Background", "/a.png");
        Model::<()>::load(&mut desktop, &group, &ctx);
        let generation = desktop.generation();
        Model::<()>::load(&mut desktop, &group, &ctx);
        assert_eq!(desktop.generation(), generation);

        let group = ConfigGroup::new().with("Background", "/b.png");
        Model::<()>::load(&mut desktop, &group, &ctx);
        assert_eq!(desktop.file_name(), Some(Path::new("/b.png")));
        assert_eq!(desktop.generation(), generation + 1);

        // A failed background keeps the previous one and is retried next reload
        let group = ConfigGroup::new().with("Background", "/missing.png");
        Model::<()>::load(&mut desktop, &group, &ctx);
        assert_eq!(desktop.file_name(), Some(Path::new("/b.png")));
    }
}
