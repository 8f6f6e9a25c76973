use std::path::{Path, PathBuf};

use crate::assets::LoadError;
use crate::world::image::rgba;
use crate::world::{AnswerSlot, Image, ImageBank, ImageError, QuestionTag, Skins};

/// Extensions tried, in order, for images named only by their stem.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "gif", "bmp"];

/// Decode any supported file into an RGBA [`Image`] named `name`.
pub fn load_image(path: &Path, name: &str) -> Result<Image, LoadError> {
    let rgba_img = image::open(path)
        .map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (w, h) = (rgba_img.width() as usize, rgba_img.height() as usize);
    let pixels = rgba_img
        .pixels()
        .map(|p| rgba(p[0], p[1], p[2], p[3]))
        .collect();
    Ok(Image::new(name, w, h, pixels)?)
}

/// `dir/stem.png`, `dir/stem.gif` or `dir/stem.bmp`, whichever exists first.
pub fn find_image(dir: &Path, stem: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

/*──────────────────────── built-in artwork ─────────────────────────*/

const TRANSPARENT: u32 = 0x0000_0000;

/// Opaque 64×64 bricks: `mortar` lines every 16 rows, staggered joints.
fn bricks(name: &str, brick: u32, mortar: u32) -> Image {
    let mut img = Image::filled(name, 64, 64, brick);
    for row in 0..64 {
        let course = row / 16;
        for col in 0..64 {
            let joint = (col + course * 16) % 32 == 0;
            if row % 16 == 0 || joint {
                img.pixels[row * 64 + col] = mortar;
            }
        }
    }
    img
}

/// A filled disc of radius 28 on a transparent 64×64 square, with an
/// optional darker ring.
fn disc(name: &str, fill: u32, ring: u32) -> Image {
    let mut img = Image::filled(name, 64, 64, TRANSPARENT);
    for row in 0..64 {
        for col in 0..64 {
            let dx = col as f32 + 0.5 - 32.0;
            let dy = row as f32 + 0.5 - 32.0;
            let r = (dx * dx + dy * dy).sqrt();
            if r <= 28.0 {
                img.pixels[row * 64 + col] = if r > 24.0 { ring } else { fill };
            }
        }
    }
    img
}

/// Procedural skins for [`Maze::demo`](crate::world::Maze::demo): brick
/// walls, three coloured props and the five quiz markers.
pub fn demo_skins(bank: &mut ImageBank) -> Result<Skins, ImageError> {
    let mut skins = Skins::default();

    let wall = bank.insert("Wall1", bricks("Wall1", rgba(150, 60, 40, 255), rgba(90, 90, 90, 255)))?;
    skins.set_wall(b'1', wall);

    let props = [
        (b'1', rgba(40, 160, 60, 255)),
        (b'2', rgba(200, 170, 40, 255)),
        (b'3', rgba(60, 90, 200, 255)),
    ];
    for (code, colour) in props {
        let name = format!("Prop{}", code as char);
        let id = bank.insert(name.clone(), disc(&name, colour, rgba(20, 20, 20, 255)))?;
        skins.set_prop(code, id);
    }

    let mark = bank.insert(
        "QuestionMark",
        disc("QuestionMark", rgba(240, 240, 240, 255), rgba(200, 30, 30, 255)),
    )?;
    skins.set_question(QuestionTag::Mark, mark);

    let answer_colours = [
        rgba(230, 60, 60, 255),
        rgba(60, 200, 60, 255),
        rgba(60, 120, 230, 255),
        rgba(230, 200, 40, 255),
    ];
    for slot in AnswerSlot::ALL {
        let name = format!("Answer{}", slot.as_char());
        let img = disc(&name, answer_colours[slot.index()], rgba(250, 250, 250, 255));
        skins.set_question(QuestionTag::Answer(slot), bank.insert(name, img)?);
    }

    Ok(skins)
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::image::is_transparent;

    #[test]
    fn decodes_png_into_argb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Wall1.png");
        let mut img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        img.put_pixel(3, 1, image::Rgba([0, 0, 0, 0]));
        img.save(&path).unwrap();

        let loaded = load_image(&path, "Wall1").unwrap();
        assert_eq!((loaded.w, loaded.h), (4, 2));
        assert_eq!(loaded.pixel(0, 0), Some(rgba(10, 20, 30, 255)));
        assert!(is_transparent(loaded.pixel(3, 1).unwrap()));
    }

    #[test]
    fn stems_try_each_extension() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::new(1, 1)
            .save(dir.path().join("Prop2.bmp"))
            .unwrap();
        assert_eq!(
            find_image(dir.path(), "Prop2"),
            Some(dir.path().join("Prop2.bmp"))
        );
        assert_eq!(find_image(dir.path(), "Prop3"), None);
    }

    #[test]
    fn broken_files_report_their_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = load_image(&path, "bad").unwrap_err();
        assert!(err.to_string().contains("bad.png"));
    }

    #[test]
    fn demo_skins_cover_the_demo_maze() {
        let mut bank = ImageBank::default();
        let skins = demo_skins(&mut bank).unwrap();
        assert!(skins.wall(b'1').is_some());
        for code in [b'1', b'2', b'3'] {
            assert!(skins.prop(code).is_some());
        }
        let a = skins.question(QuestionTag::Answer(AnswerSlot::A)).unwrap();
        let a = bank.image(a).unwrap();
        // transparent corners, opaque centre
        assert!(is_transparent(a.pixel(0, 0).unwrap()));
        assert!(!is_transparent(a.pixel(32, 32).unwrap()));
        assert_eq!(bank.len(), 1 + 1 + 3 + 5);
    }
}
