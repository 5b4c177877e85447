use egui::Color32;

pub const UNOWNED_COLOR: Color32 = Color32::LIGHT_GRAY;

/// 与 JVM `String.hashCode` 一致的32位字符串哈希（按UTF-16码元计算）
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// 取名称哈希的低24位作为RGB
pub fn nation_color(name: &str) -> Color32 {
    let hash = name_hash(name);
    let r = ((hash & 0xFF0000) >> 16) as u8;
    let g = ((hash & 0x00FF00) >> 8) as u8;
    let b = (hash & 0x0000FF) as u8;
    Color32::from_rgb(r, g, b)
}
