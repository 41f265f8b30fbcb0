//! Theme packs offered to clients. Static; no authentication needed.

use api_types::theme::ThemePack;
use axum::Json;

const THEME_PACKS: [(&str, &str, u32, u32, u32); 3] = [
    ("splitwise", "Splitwise", 0xFF26_A17B, 0xFF1A_8F6C, 0xFF00_0000),
    ("tokyoNight", "Tokyo Night", 0xFF7A_A2F7, 0xFF7D_CFFF, 0xFF1D_1D1D),
    ("mint", "Mint", 0xFF3F_BF9B, 0xFF2F_AE8E, 0xFF0B_3D2E),
];

pub fn theme_packs() -> Vec<ThemePack> {
    THEME_PACKS
        .iter()
        .map(|&(family_id, display_name, light, dark, high_contrast)| ThemePack {
            family_id: family_id.to_string(),
            display_name: display_name.to_string(),
            light_accent: light,
            dark_accent: dark,
            high_contrast_accent: high_contrast,
        })
        .collect()
}

pub async fn list() -> Json<Vec<ThemePack>> {
    Json(theme_packs())
}
