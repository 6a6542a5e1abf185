use common::model::variant::VariantKind;

/// Extensions dropped from photo file names, compared case-insensitively.
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

/// Canonical lookup key for a branch code or a photo file name.
///
/// Directory components and a trailing image extension are dropped. A value
/// that then looks numeric (`101.0`) is cut at its first `.`, so a
/// float-coerced code and a photo `101_1.jpg` reduce to `101` and `101_1`.
/// Only the last extension goes: `101_1.old.jpg` keys as `101_1.old`. Case
/// and inner whitespace are preserved. Idempotent.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let name = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    let stem = strip_image_extension(name);
    if looks_numeric(stem) {
        if let Some(dot) = stem.find('.') {
            return stem[..dot].to_string();
        }
    }
    stem.to_string()
}

fn strip_image_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot)
            if dot > 0
                && IMAGE_EXTENSIONS
                    .iter()
                    .any(|ext| name[dot + 1..].eq_ignore_ascii_case(ext)) =>
        {
            &name[..dot]
        }
        _ => name,
    }
}

fn looks_numeric(value: &str) -> bool {
    value.starts_with(|c: char| c.is_ascii_digit())
        && value.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Key a photo for `branch` and `kind` is expected under: `{branch}_{type_id}`.
pub fn expected_key(branch: &str, kind: VariantKind) -> String {
    format!("{}_{}", branch, kind.type_id())
}
