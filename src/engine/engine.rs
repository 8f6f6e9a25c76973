use glam::Vec2;

use crate::{
    engine::caster::RayCaster,
    engine::hit::{ObjectHit, ObjectKind, Sightings, WallHit, sort_far_to_near},
    engine::projection::{ObjectProjector, Slice, project_slice, wall_texture_column},
    engine::types::{Screen, ViewConfig},
    renderer::{ColumnSpan, Renderer, Rgba},
    world::{
        AngleTable, Background, BackgroundChange, Destination, Gradient, Image, ImageBank,
        ImageId, Landscape, Maze, MazeAngle, QuestionId, Skins, TILE_SIZE, Trap,
    },
};

/// One maze, its images and the per-frame scratch of the column pipeline.
pub struct Engine<R: Renderer> {
    pub renderer: R,
    tables: AngleTable,
    maze: Maze,
    bank: ImageBank,
    skins: Skins,
    view: ViewConfig,
    screen: Screen,
    background: Background,
    landscape: Option<Landscape>,
    overlay: Option<ImageId>,
    sightings: Sightings,
    objects: Vec<ObjectHit>,
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R, maze: Maze, bank: ImageBank, skins: Skins, view: ViewConfig) -> Self {
        let screen = view.screen();
        Self {
            renderer,
            tables: AngleTable::new(view.width),
            maze,
            bank,
            skins,
            view,
            screen,
            background: Background::gradient(&Gradient::default(), screen.w, screen.h),
            landscape: None,
            overlay: None,
            sightings: Sightings::default(),
            objects: Vec::new(),
        }
    }

    #[inline]
    pub fn tables(&self) -> &AngleTable {
        &self.tables
    }
    #[inline]
    pub fn maze(&self) -> &Maze {
        &self.maze
    }
    #[inline]
    pub fn bank(&self) -> &ImageBank {
        &self.bank
    }
    #[inline]
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }
    #[inline]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }
    #[inline]
    pub fn background(&self) -> &Background {
        &self.background
    }
    #[inline]
    pub fn landscape(&self) -> Option<&Landscape> {
        self.landscape.as_ref()
    }
    #[inline]
    pub fn overlay(&self) -> Option<ImageId> {
        self.overlay
    }

    /// Objects drawn in the last frame, far to near.
    pub fn last_objects(&self) -> &[ObjectHit] {
        &self.objects
    }

    /// Swap the background and landscape the way `dest` asks for.
    pub fn apply_destination(&mut self, dest: &Destination) {
        let (w, h) = (self.screen.w, self.screen.h);
        match &dest.background {
            BackgroundChange::Keep => {}
            BackgroundChange::Gradient(g) => self.background = Background::gradient(g, w, h),
            BackgroundChange::Image(id) => match self.bank.image(*id) {
                Ok(img) => self.background = Background::from_image(img, w, h),
                Err(e) => log::warn!("background not changed: {e}"),
            },
        }
        if let Some(l) = dest.landscape {
            self.landscape = Some(l);
        }
    }

    /// Environment side of a trap: its overlay replaces the current one
    /// and its destination, if any, restyles the scene.
    pub fn enter_trap(&mut self, trap: &Trap, destinations: &[Destination]) {
        self.overlay = trap.overlay;
        if let Some(dest) = trap.destination.and_then(|i| destinations.get(i)) {
            self.apply_destination(dest);
        }
    }

    /// Draw one frame seen from `pos` facing `angle` and hand it to `submit`.
    pub fn render_frame<F>(
        &mut self,
        pos: Vec2,
        angle: MazeAngle,
        active: Option<QuestionId>,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        let Self {
            renderer,
            tables,
            maze,
            bank,
            skins,
            view,
            screen,
            background,
            landscape,
            overlay,
            sightings,
            objects,
        } = self;
        let (tables, maze, bank, skins) = (&*tables, &*maze, &*bank, &*skins);

        renderer.begin_frame(screen.w, screen.h, background.pixels());
        sightings.clear();
        objects.clear();

        /* ------------------------------------------------ walls */
        let arcs = tables.arcs();
        let caster = RayCaster::new(tables, maze, pos, active);
        let strip = landscape
            .as_ref()
            .and_then(|l| bank.image(l.image).ok().map(|img| (l, img)));

        let mut cast_angle = tables.wrap(angle - arcs.a30);
        for col in 0..screen.w {
            if let Some(hit) = caster.cast(cast_angle, sightings) {
                if let Some((l, img)) = strip {
                    let src = l.source_column(cast_angle, arcs.a360, img.w);
                    renderer.draw_landscape(col, src, l.offset_from_top, img);
                }
                if let Some(tile) = hit.tile {
                    let img = skins.wall(maze.wall_code(tile)).and_then(|id| bank.image(id).ok());
                    let span = wall_span(tables, view, screen, col, &hit, img);
                    renderer.draw_wall(&span, img);
                }
            }
            cast_angle = tables.turn(cast_angle, 1);
        }

        /* ------------------------------------------------ objects */
        let projector = ObjectProjector::new(tables);
        objects.extend(
            sightings
                .iter()
                .filter_map(|s| projector.project_sighting(s, maze, pos, angle)),
        );
        sort_far_to_near(objects);

        let mut drawn = 0usize;
        for obj in objects.iter() {
            let id = match obj.kind {
                ObjectKind::Prop(code) => skins.prop(code),
                ObjectKind::Question(tag) => skins.question(tag),
            };
            let Some(img) = id.and_then(|id| bank.image(id).ok()) else {
                continue;
            };
            let slice = project_slice(screen, view.prop_height, view.plane_distance, obj.distance);
            drawn += draw_object(renderer, screen, &slice, obj, img);
        }

        /* ------------------------------------------------ overlay */
        if let Some(img) = overlay.and_then(|id| bank.image(id).ok()) {
            renderer.draw_overlay(img);
        }

        log::trace!(
            "frame: {} objects sighted, {} projected, {} columns drawn",
            sightings.len(),
            objects.len(),
            drawn
        );

        renderer.end_frame(submit);
    }
}

/// Fish-eye corrected wall column for screen column `col`.
fn wall_span(
    tables: &AngleTable,
    view: &ViewConfig,
    screen: &Screen,
    col: usize,
    hit: &WallHit,
    img: Option<&Image>,
) -> ColumnSpan {
    let depth = hit.distance / tables.fish(col as i32).unwrap_or(1.0);
    let slice = project_slice(screen, view.wall_height, view.plane_distance, depth);
    let src_col = img.map_or(0, |img| wall_texture_column(hit) * img.w / TILE_SIZE as usize);
    ColumnSpan {
        col,
        top: slice.top,
        height: slice.height,
        src_col,
        depth,
    }
}

/// Fan an object out from its mid column, one source column per screen
/// column, stepping through the image at `img.w / height` per column.
/// Returns the number of columns that ended up in front of the walls.
fn draw_object<R: Renderer>(
    renderer: &mut R,
    screen: &Screen,
    slice: &Slice,
    obj: &ObjectHit,
    img: &Image,
) -> usize {
    if slice.height <= 0.0 || img.w == 0 {
        return 0;
    }
    let half = (slice.height * 0.5) as i32;
    let ratio = img.w as f32 / slice.height;
    let mid_src = (img.w / 2) as i32;
    let last_src = img.w as i32 - 1;
    let w = screen.w as i32;

    let mut drawn = 0;
    let mut put = |col: i32, src: i32| {
        if !(0..w).contains(&col) {
            return;
        }
        let span = ColumnSpan {
            col: col as usize,
            top: slice.top,
            height: slice.height,
            src_col: src as usize,
            depth: obj.distance,
        };
        if renderer.draw_object(&span, img) {
            drawn += 1;
        }
    };

    for k in 0..=half {
        let offset = (k as f32 * ratio) as i32;
        put(obj.mid_column - k, (mid_src - offset).max(0));
        if k > 0 {
            put(obj.mid_column + k, (mid_src + offset).min(last_src));
        }
    }
    drawn
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
