use hashbrown::HashMap;
use serde::Serialize;

use retrace_core::ids::NodeId;
use retrace_core::node::{Node, NodeKind};

/// Display color, 0..255 per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Fallback when a mapping has nothing better to offer.
const NEUTRAL: Rgb = Rgb(180, 180, 180);

/// 10-step blue gradient for the degree mapping, light to dark.
const PALETTE_BLUE: [Rgb; 10] = [
    Rgb(227, 242, 253),
    Rgb(187, 222, 251),
    Rgb(144, 202, 249),
    Rgb(100, 181, 246),
    Rgb(66, 165, 245),
    Rgb(33, 150, 243),
    Rgb(30, 136, 229),
    Rgb(25, 118, 210),
    Rgb(21, 101, 192),
    Rgb(13, 71, 161),
];

/// 10-color categorical palette for the id mapping.
const PALETTE_CAT10: [Rgb; 10] = [
    Rgb(31, 119, 180),
    Rgb(255, 127, 14),
    Rgb(44, 160, 44),
    Rgb(214, 39, 40),
    Rgb(148, 103, 189),
    Rgb(140, 86, 75),
    Rgb(227, 119, 194),
    Rgb(127, 127, 127),
    Rgb(188, 189, 34),
    Rgb(23, 190, 207),
];

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Regular => "Regular",
        NodeKind::Uav => "Uav",
        NodeKind::Intruder => "Intruder",
    }
}

fn kind_color(kind: NodeKind) -> Rgb {
    match kind {
        NodeKind::Regular => Rgb(255, 165, 0),
        NodeKind::Uav => Rgb(63, 140, 255),
        NodeKind::Intruder => Rgb(220, 53, 69),
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t) as u8
}

/// Linear interpolation across an ordered palette, t clamped to 0..1.
fn interp_palette(palette: &[Rgb], t: f64) -> Rgb {
    let Some(last) = palette.last() else {
        return NEUTRAL;
    };
    if palette.len() == 1 {
        return *last;
    }
    let scaled = t.clamp(0.0, 1.0) * (palette.len() - 1) as f64;
    let i = scaled.floor() as usize;
    let j = (i + 1).min(palette.len() - 1);
    let frac = scaled - i as f64;
    let (a, b) = (palette[i], palette[j]);
    Rgb(
        lerp(a.0, b.0, frac),
        lerp(a.1, b.1, frac),
        lerp(a.2, b.2, frac),
    )
}

/// FNV-1a over the id bytes, folded into [0, 1). Stable across runs and
/// platforms, which keeps id colors reproducible between sessions.
fn unit_hash(id: NodeId) -> f64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    let mut hash = FNV_OFFSET;
    for byte in id.as_u64().to_le_bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    (hash >> 11) as f64 / (1u64 << 53) as f64
}

/// Shared context handed to every mapping: the communication radius plus
/// degrees precomputed once from the grid index, so the degree mapping and
/// the statistics agree on the same values.
#[derive(Clone, Debug, Default)]
pub struct MapContext {
    pub radius_comm: f64,
    pub max_degree: usize,
    pub degrees: HashMap<NodeId, usize>,
}

/// Legend descriptor shipped with the snapshot for the active mapping.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Legend {
    Categorical {
        title: String,
        items: Vec<LegendItem>,
    },
    Note {
        title: String,
        note: String,
    },
    Continuous {
        title: String,
        from: String,
        to: String,
        colors: Vec<String>,
    },
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
}

/// The closed set of color-mapping strategies, selected by a stable string
/// key. Unknown keys leave the current selection untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMap {
    #[default]
    ByType,
    ById,
    ByDegree,
}

impl ColorMap {
    pub fn all() -> [ColorMap; 3] {
        [ColorMap::ByType, ColorMap::ById, ColorMap::ByDegree]
    }

    pub fn from_key(key: &str) -> Option<ColorMap> {
        match key {
            "by_type" => Some(ColorMap::ByType),
            "by_id" => Some(ColorMap::ById),
            "by_degree" => Some(ColorMap::ByDegree),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ColorMap::ByType => "by_type",
            ColorMap::ById => "by_id",
            ColorMap::ByDegree => "by_degree",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorMap::ByType => "By node type",
            ColorMap::ById => "By id (stable hash)",
            ColorMap::ByDegree => "By degree (neighbor count)",
        }
    }

    pub fn color_of(&self, node: &Node, context: &MapContext) -> Rgb {
        match self {
            ColorMap::ByType => kind_color(node.kind),
            ColorMap::ById => interp_palette(&PALETTE_CAT10, unit_hash(node.id)),
            ColorMap::ByDegree => {
                if context.radius_comm <= 0.0 {
                    return NEUTRAL;
                }
                let degree = context.degrees.get(&node.id).copied().unwrap_or(0);
                let t = degree as f64 / context.max_degree.max(1) as f64;
                interp_palette(&PALETTE_BLUE, t)
            }
        }
    }

    pub fn legend(&self, _context: &MapContext) -> Legend {
        match self {
            ColorMap::ByType => Legend::Categorical {
                title: self.label().to_string(),
                items: [NodeKind::Regular, NodeKind::Uav, NodeKind::Intruder]
                    .iter()
                    .map(|kind| LegendItem {
                        label: kind_label(*kind).to_string(),
                        color: kind_color(*kind).to_hex(),
                    })
                    .collect(),
            },
            ColorMap::ById => Legend::Note {
                title: self.label().to_string(),
                note: "Stable color derived from the node id.".to_string(),
            },
            ColorMap::ByDegree => Legend::Continuous {
                title: self.label().to_string(),
                from: "low degree".to_string(),
                to: "high degree".to_string(),
                colors: vec![
                    PALETTE_BLUE[0].to_hex(),
                    PALETTE_BLUE[PALETTE_BLUE.len() - 1].to_hex(),
                ],
            },
        }
    }
}
