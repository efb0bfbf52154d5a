//! Generates the demo sprite sheet at build time so no binary assets need to
//! live in the repository. The layout must agree with `resources/sprites.json`:
//! one row per facing (down, up, left, right), column 0 is the idle frame,
//! columns 1..=3 are the walking cycle.

use image::{Rgba, RgbaImage};

const FRAME_W: u32 = 24;
const FRAME_H: u32 = 26;

const BODY: Rgba<u8> = Rgba([0xF5, 0xD0, 0x30, 0xFF]);
const TRIM: Rgba<u8> = Rgba([0x80, 0x60, 0x00, 0xFF]);
const EYE: Rgba<u8> = Rgba([0x10, 0x10, 0x10, 0xFF]);
const BOOT: Rgba<u8> = Rgba([0x40, 0x30, 0x10, 0xFF]);

/// Walk-cycle phase: 0 = idle/contact, 1 = left foot forward, 2 = right foot
/// forward. Column 3 reuses the contact pose so the cycle reads 1-2-1-3 style.
fn draw_frame(sheet: &mut RgbaImage, col: u32, row: u32, phase: u32) {
    let ox = col * FRAME_W;
    let oy = row * FRAME_H;

    // Body with a thin dark border, inset one pixel on each side.
    for y in 1..FRAME_H - 3 {
        for x in 1..FRAME_W - 1 {
            let on_border = x == 1 || x == FRAME_W - 2 || y == 1 || y == FRAME_H - 4;
            sheet.put_pixel(ox + x, oy + y, if on_border { TRIM } else { BODY });
        }
    }

    // Eyes: placement encodes the facing so the four rows are tellable apart.
    // row 0 = down (both eyes low), 1 = up (none visible), 2 = left, 3 = right.
    let ey = FRAME_H / 3;
    match row {
        0 => {
            sheet.put_pixel(ox + FRAME_W / 4, oy + ey, EYE);
            sheet.put_pixel(ox + 3 * FRAME_W / 4, oy + ey, EYE);
        }
        2 => sheet.put_pixel(ox + FRAME_W / 4, oy + ey, EYE),
        3 => sheet.put_pixel(ox + 3 * FRAME_W / 4, oy + ey, EYE),
        _ => {}
    }

    // Feet: two 3px boots whose stagger depends on the walk phase.
    let fy = FRAME_H - 3;
    let (lx, rx) = match phase {
        1 => (FRAME_W / 4 - 2, 3 * FRAME_W / 4 + 1),
        2 => (FRAME_W / 4 + 1, 3 * FRAME_W / 4 - 2),
        _ => (FRAME_W / 4, 3 * FRAME_W / 4),
    };
    for dx in 0..3 {
        for dy in 0..2 {
            sheet.put_pixel(ox + lx + dx - 1, oy + fy + dy, BOOT);
            sheet.put_pixel(ox + rx + dx - 1, oy + fy + dy, BOOT);
        }
    }
}

fn main() {
    let mut sheet = RgbaImage::new(FRAME_W * 4, FRAME_H * 4);

    for row in 0..4 {
        draw_frame(&mut sheet, 0, row, 0); // idle
        draw_frame(&mut sheet, 1, row, 1);
        draw_frame(&mut sheet, 2, row, 2);
        draw_frame(&mut sheet, 3, row, 0);
    }

    let out_dir = std::env::var("OUT_DIR").expect("build: OUT_DIR not set");
    let path = std::path::Path::new(&out_dir).join("sheet.png");
    sheet
        .save(&path)
        .unwrap_or_else(|e| panic!("build: could not save {}: {e}", path.display()));

    println!("cargo:rerun-if-changed=build.rs");
}
