//! Backup and storage display formatting

use chrono::{DateTime, Utc};

use crate::models::Backup;
use crate::storage::StorageUsage;

/// Format the backup log, newest first as given
pub fn format_backup_list(backups: &[Backup], now: DateTime<Utc>) -> String {
    if backups.is_empty() {
        return "No backups found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>6} {:8} {:>8} {:>6}  {}\n",
        "ID", "Type", "Age", "Items", "Label"
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for backup in backups {
        output.push_str(&format!(
            "{:>6} {:8} {:>8} {:>6}  {}\n",
            backup.id.to_string(),
            backup.kind.to_string(),
            format_duration(now.signed_duration_since(backup.timestamp)),
            backup.count,
            backup.label
        ));
    }

    output.push_str(&format!("\nTotal: {} backup(s)\n", backups.len()));
    output
}

/// Format one backup's metadata
pub fn format_backup_details(backup: &Backup) -> String {
    let mut output = String::new();
    output.push_str(&format!("Backup:  {}\n", backup.id));
    output.push_str(&format!("Label:   {}\n", backup.label));
    output.push_str(&format!("Type:    {}\n", backup.kind));
    output.push_str(&format!(
        "Created: {}\n",
        backup.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("Items:   {}\n", backup.count));
    output
}

/// Format container usage
pub fn format_storage_usage(usage: &StorageUsage) -> String {
    let mut output = String::new();
    output.push_str(&format!("Expenses table: {}\n", format_size(usage.expenses_bytes)));
    output.push_str(&format!("Backup log:     {}\n", format_size(usage.backups_bytes)));
    output.push_str(&format!("Total used:     {}\n", format_size(usage.used_bytes())));

    match usage.available_bytes {
        Some(available) => {
            output.push_str(&format!("Disk available: {}\n", format_size(available)));
        }
        None => output.push_str("Disk available: unknown\n"),
    }
    if let Some(percentage) = usage.percentage() {
        output.push_str(&format!("Used:           {:.4}%\n", percentage));
    }

    output
}

/// Format a duration compactly ("5m", "3d")
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a byte count with binary units
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
