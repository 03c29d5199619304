//! Group display formatting
//!
//! Formats groups for terminal output in list and detail views.

use crate::models::Group;

/// Format a list of groups as a table
pub fn format_group_list(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "No groups found. Create one with 'splitit group create'.\n".to_string();
    }

    let name_width = groups
        .iter()
        .map(|g| g.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:>7}  {}\n",
        "Name",
        "ID",
        "Members",
        "Created",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:->7}  {:-<10}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for group in groups {
        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {:>7}  {}\n",
            group.name,
            group.id.to_string(),
            group.members.len(),
            group.created_at.format("%Y-%m-%d"),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single group's details
pub fn format_group_details(group: &Group) -> String {
    let mut output = String::new();

    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:       {}\n", group.id));
    output.push_str(&format!(
        "  Created:  {}\n",
        group.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!("  Members ({}):\n", group.members.len()));
    for member in &group.members {
        output.push_str(&format!("    - {}\n", member));
    }

    output
}
