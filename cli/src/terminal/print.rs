use colored::*;
use glizzy_common::gatt::CharacteristicDescriptor;
use glizzy_common::plain;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;

pub const TOTAL_WIDTH: usize = 64;
const KEY_WIDTH: usize = 10;

pub fn banner(theme: &Theme) {
    let text_content: String = format!("⟦ GLIZZY v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.color(theme.success).bold();
    let sep: ColoredString = "═"
        .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
        .color(theme.separator);
    plain!("{sep}{text}{sep}");
    centerln(&"BLE GATT handle fuzzer".italic().to_string());
}

pub fn header(msg: &str, theme: &Theme) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    plain!(
        "{}{}{}",
        "─".repeat(left).color(theme.separator),
        formatted.to_uppercase().color(theme.accent),
        "─".repeat(right).color(theme.separator)
    );
}

pub fn fat_separator(theme: &Theme) {
    plain!("{}", "═".repeat(TOTAL_WIDTH).color(theme.separator));
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    plain!("{space}{msg}");
}

pub fn tree_head(idx: usize, name: &str, theme: &Theme) {
    let idx_str: String = format!("[{}]", idx.to_string().color(theme.accent));
    plain!("{} {}", idx_str.color(theme.separator), name.color(theme.handle));
}

pub fn as_tree_one_level(key_value_pair: Vec<(String, ColoredString)>, theme: &Theme) {
    for (i, (key, value)) in key_value_pair.iter().enumerate() {
        let last: bool = i + 1 == key_value_pair.len();
        let branch: ColoredString = (if !last { "├─" } else { "└─" }).color(theme.separator);
        plain!(
            " {} {}{}{} {}",
            branch,
            key.color(theme.text),
            ".".repeat(KEY_WIDTH.saturating_sub(key.len())).color(theme.separator),
            ":".color(theme.separator),
            value
        );
    }
}

pub fn characteristics(descriptors: &[CharacteristicDescriptor], theme: &Theme) {
    for (idx, desc) in descriptors.iter().enumerate() {
        tree_head(idx, &desc.handle.to_string(), theme);
        as_tree_one_level(
            vec![
                ("Properties".to_string(), desc.describe_properties().normal()),
                ("Value".to_string(), desc.value_handle.to_string().color(theme.handle)),
                ("UUID".to_string(), desc.uuid.normal()),
            ],
            theme,
        );
    }
}
