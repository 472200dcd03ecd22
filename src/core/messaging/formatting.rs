// Small pure helpers behind the staff and help commands.

/// Color used by `/embed` when none is given or the given one is unusable.
pub const DEFAULT_EMBED_COLOR: u32 = 0x7d2ae8;

/// Highest color value the platform accepts.
const MAX_EMBED_COLOR: u32 = 0xFFFFFF;

/// Most messages the platform returns per fetch or accepts per bulk delete.
pub const MAX_BULK_DELETE: u64 = 100;

/// Bulk delete refuses messages older than two weeks.
pub const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60;

/// Parse a user supplied hex color (`#7d2ae8`, `7d2ae8`, `0x7d2ae8`).
///
/// Never fails: anything unusable falls back to `DEFAULT_EMBED_COLOR`.
pub fn parse_embed_color(input: Option<&str>) -> u32 {
    let Some(raw) = input else {
        return DEFAULT_EMBED_COLOR;
    };

    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    match u32::from_str_radix(digits, 16) {
        Ok(color) if !digits.is_empty() && color <= MAX_EMBED_COLOR => color,
        _ => DEFAULT_EMBED_COLOR,
    }
}

/// How many messages `$purge <amount>` should delete, counting the invoking
/// message. `None` for zero.
pub fn purge_batch_size(amount: u64) -> Option<u64> {
    match amount {
        0 => None,
        n => Some(n.saturating_add(1)),
    }
}

/// Fetch limits that together cover `total` messages, newest page first.
pub fn purge_fetch_limits(total: u64) -> impl Iterator<Item = u8> {
    let full_pages = total / MAX_BULK_DELETE;
    let rest = total % MAX_BULK_DELETE;

    (0..full_pages)
        .map(|_| MAX_BULK_DELETE as u8)
        .chain((rest > 0).then_some(rest as u8))
}

/// One fetched page of a purge, split by how it has to be deleted.
#[derive(Debug, PartialEq, Eq)]
pub struct PurgePage<T> {
    /// Young enough for a single bulk delete request.
    pub bulk: Vec<T>,
    /// Older than `BULK_DELETE_MAX_AGE_SECS`, deleted one at a time.
    pub single: Vec<T>,
}

/// Split `(id, created_at_unix_secs)` pairs at the bulk delete age limit.
pub fn split_purge_page<T>(
    messages: impl IntoIterator<Item = (T, i64)>,
    now: i64,
) -> PurgePage<T> {
    let cutoff = now - BULK_DELETE_MAX_AGE_SECS;
    let (bulk, single) = messages
        .into_iter()
        .partition::<Vec<_>, _>(|(_, created_at)| *created_at > cutoff);

    PurgePage {
        bulk: bulk.into_iter().map(|(id, _)| id).collect(),
        single: single.into_iter().map(|(id, _)| id).collect(),
    }
}

/// Sections of the `$help` embed, in display order.
pub const HELP_CATEGORIES: &[(&str, &str)] = &[
    ("Staff", "👮 Staff"),
    ("Owner", "⚙️ Owner (DM)"),
    ("User", "👤 User"),
];

/// A command as `$help` needs to see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandListing {
    pub name: String,
    pub category: Option<String>,
    pub slash_only: bool,
}

/// Group commands into help sections. Each section is rendered as a single
/// line like `$kick $ban /embed`. Empty sections are dropped, uncategorized
/// commands are not listed.
pub fn help_sections(commands: &[CommandListing]) -> Vec<(&'static str, String)> {
    HELP_CATEGORIES
        .iter()
        .filter_map(|(category, heading)| {
            let line = commands
                .iter()
                .filter(|c| c.category.as_deref() == Some(*category))
                .map(|c| {
                    if c.slash_only {
                        format!("/{}", c.name)
                    } else {
                        format!("${}", c.name)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");

            if line.is_empty() {
                None
            } else {
                Some((*heading, line))
            }
        })
        .collect()
}
