// Gradient KPI cards for the static report.
//
// Each card is a 400×150 PNG with a vertical gradient and three white
// strings: a centred title, a centred value in a larger bold face, and a
// subtitle pinned to the lower left.
//
// Text is drawn with TrueType faces when they can be found on disk. If they
// cannot, a built-in 8×8 bitmap font is used instead; `resolve_fonts`
// reports which tier was picked.
use crate::config::FontConfig;
use crate::error::ReportError;
use crate::types::AggregateSnapshot;
use ab_glyph::{FontArc, PxScale};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const CARD_WIDTH: u32 = 400;
pub const CARD_HEIGHT: u32 = 150;

const TITLE_Y: i32 = 20;
const VALUE_Y: i32 = 50;
const SUBTITLE_POS: (i32, i32) = (20, 110);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontTier {
    Preferred,
    Fallback,
}

#[derive(Clone)]
pub enum CardFont {
    Outline { font: FontArc, scale: PxScale },
    /// `font8x8` glyphs, each pixel drawn as a `scale`×`scale` block.
    Bitmap { scale: u32 },
}

impl CardFont {
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        match self {
            CardFont::Outline { font, scale } => text_size(*scale, font, text),
            CardFont::Bitmap { scale } => {
                let chars = text.chars().count() as u32;
                (chars * 8 * scale, 8 * scale)
            }
        }
    }

    fn draw(&self, img: &mut RgbImage, x: i32, y: i32, text: &str) {
        match self {
            CardFont::Outline { font, scale } => {
                draw_text_mut(img, TEXT_COLOR, x, y, *scale, font, text);
            }
            CardFont::Bitmap { scale } => draw_bitmap_text(img, x, y, *scale, text),
        }
    }
}

fn draw_bitmap_text(img: &mut RgbImage, x: i32, y: i32, scale: u32, text: &str) {
    let scale = scale as i32;
    for (i, ch) in text.chars().enumerate() {
        // Characters outside the basic set keep their advance but stay blank.
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let origin_x = x + i as i32 * 8 * scale;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col * scale;
                let py = y + row as i32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        put_clipped(img, px + dx, py + dy, TEXT_COLOR);
                    }
                }
            }
        }
    }
}

fn put_clipped(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

#[derive(Clone)]
pub struct CardFonts {
    pub tier: FontTier,
    pub title: CardFont,
    pub value: CardFont,
    pub subtitle: CardFont,
}

/// Pick the card faces. Both the regular and the bold TrueType face must load
/// for the preferred tier; otherwise every string uses the bitmap font.
pub fn resolve_fonts(config: &FontConfig) -> CardFonts {
    match (load_first(&config.regular), load_first(&config.bold)) {
        (Some(regular), Some(bold)) => CardFonts {
            tier: FontTier::Preferred,
            title: CardFont::Outline {
                font: regular.clone(),
                scale: PxScale::from(18.0),
            },
            value: CardFont::Outline {
                font: bold,
                scale: PxScale::from(32.0),
            },
            subtitle: CardFont::Outline {
                font: regular,
                scale: PxScale::from(14.0),
            },
        },
        _ => {
            warn!("Preferred card fonts not found, using the built-in bitmap font");
            CardFonts {
                tier: FontTier::Fallback,
                title: CardFont::Bitmap { scale: 2 },
                value: CardFont::Bitmap { scale: 3 },
                subtitle: CardFont::Bitmap { scale: 2 },
            }
        }
    }
}

fn load_first(candidates: &[PathBuf]) -> Option<FontArc> {
    candidates.iter().find_map(|path| {
        let bytes = fs::read(path).ok()?;
        match FontArc::try_from_vec(bytes) {
            Ok(font) => {
                debug!("Using font {}", path.display());
                Some(font)
            }
            Err(e) => {
                debug!("Skipping font {}: {}", path.display(), e);
                None
            }
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub subtitle: String,
    pub file_name: &'static str,
    pub start: Rgb<u8>,
    pub end: Rgb<u8>,
}

impl KpiCard {
    pub fn new(
        title: &str,
        value: String,
        subtitle: &str,
        file_name: &'static str,
        start: [u8; 3],
        end: [u8; 3],
    ) -> Self {
        Self {
            title: title.to_string(),
            value,
            subtitle: subtitle.to_string(),
            file_name,
            start: Rgb(start),
            end: Rgb(end),
        }
    }
}

/// The five cards of the static report, in placement order.
pub fn static_cards(snapshot: &AggregateSnapshot) -> Vec<KpiCard> {
    vec![
        KpiCard::new(
            "Avg Work Screen Time",
            format!("{:.2} hrs", snapshot.avg_work_screen),
            "Work-related screen usage",
            "kpi1.png",
            [84, 142, 212],
            [154, 196, 255],
        ),
        KpiCard::new(
            "Avg Leisure Screen Time",
            format!("{:.2} hrs", snapshot.avg_leisure_screen),
            "Entertainment & social",
            "kpi2.png",
            [77, 175, 124],
            [161, 225, 188],
        ),
        KpiCard::new(
            "Most Common Sleep Quality",
            snapshot.sleep_quality_mode_label().to_string(),
            "Most frequent sleep rating",
            "kpi3.png",
            [255, 163, 72],
            [255, 207, 140],
        ),
        KpiCard::new(
            "Avg Stress Level",
            format!("{:.2}/10", snapshot.avg_stress),
            "Reported stress level",
            "kpi4.png",
            [230, 90, 90],
            [255, 153, 153],
        ),
        KpiCard::new(
            "Avg Total Screen Time",
            format!("{:.2} hrs", snapshot.avg_total_screen),
            "Daily screen exposure",
            "kpi5.png",
            [100, 100, 255],
            [160, 180, 255],
        ),
    ]
}

/// Colour of gradient row `y` for a card of `height` rows.
pub fn gradient_row(start: Rgb<u8>, end: Rgb<u8>, y: u32, height: u32) -> Rgb<u8> {
    let ratio = y as f64 / height as f64;
    let mix = |s: u8, e: u8| (s as f64 * (1.0 - ratio) + e as f64 * ratio) as u8;
    Rgb([
        mix(start[0], end[0]),
        mix(start[1], end[1]),
        mix(start[2], end[2]),
    ])
}

/// Left edge that centres a string of `text_width` pixels on the card.
pub fn centered_x(text_width: u32) -> i32 {
    ((CARD_WIDTH as f64 - text_width as f64) / 2.0).floor() as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub title: (i32, i32),
    pub value: (i32, i32),
    pub subtitle: (i32, i32),
}

pub fn card_layout(card: &KpiCard, fonts: &CardFonts) -> CardLayout {
    let (title_w, _) = fonts.title.text_size(&card.title);
    let (value_w, _) = fonts.value.text_size(&card.value);
    CardLayout {
        title: (centered_x(title_w), TITLE_Y),
        value: (centered_x(value_w), VALUE_Y),
        subtitle: SUBTITLE_POS,
    }
}

pub fn draw_kpi_card(card: &KpiCard, fonts: &CardFonts) -> RgbImage {
    let mut img = RgbImage::new(CARD_WIDTH, CARD_HEIGHT);
    for y in 0..CARD_HEIGHT {
        let color = gradient_row(card.start, card.end, y, CARD_HEIGHT);
        for x in 0..CARD_WIDTH {
            img.put_pixel(x, y, color);
        }
    }

    let layout = card_layout(card, fonts);
    fonts.title.draw(&mut img, layout.title.0, layout.title.1, &card.title);
    fonts.value.draw(&mut img, layout.value.0, layout.value.1, &card.value);
    fonts
        .subtitle
        .draw(&mut img, layout.subtitle.0, layout.subtitle.1, &card.subtitle);
    img
}

pub fn render_kpi_card(card: &KpiCard, fonts: &CardFonts, path: &Path) -> Result<(), ReportError> {
    draw_kpi_card(card, fonts).save(path)?;
    info!("KPI card written to {}", path.display());
    Ok(())
}
