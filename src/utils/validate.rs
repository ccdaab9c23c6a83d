use once_cell::sync::Lazy;
use regex::Regex;

static PREFERRED_LEVEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 _-]+$").expect("Invalid preferred level regex"));

/// 期望级别最大长度（字符）
pub const MAX_PREFERRED_LEVEL_LEN: usize = 32;

/// 管理员备注最大长度（字符）
pub const MAX_ADMIN_NOTES_LEN: usize = 2000;

/// 校验并规范化期望级别，空白输入视为未填写
pub fn validate_preferred_level(level: Option<&str>) -> Result<Option<String>, &'static str> {
    let Some(level) = level.map(str::trim).filter(|l| !l.is_empty()) else {
        return Ok(None);
    };

    if level.chars().count() > MAX_PREFERRED_LEVEL_LEN {
        return Err("Preferred level must be at most 32 characters");
    }
    // 只能包含字母、数字、空格、下划线或连字符
    if !PREFERRED_LEVEL_RE.is_match(level) {
        return Err(
            "Preferred level must contain only letters, numbers, spaces, underscores or hyphens",
        );
    }

    Ok(Some(level.to_string()))
}

/// 规范化管理员备注
pub fn validate_admin_notes(notes: Option<&str>) -> Result<Option<String>, &'static str> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_ADMIN_NOTES_LEN {
        return Err("Admin notes must be at most 2000 characters");
    }

    Ok(Some(notes.to_string()))
}
