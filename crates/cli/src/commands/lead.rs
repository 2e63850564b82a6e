// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use lead_core::{LeadCache, LeadField, LeadPatch, LeadRecord, NewLead};

use crate::cli::{LeadArgs, OutputFormat};
use crate::display::format_lead_line;
use crate::error::{Error, Result};

use super::{print_json, print_lines};

fn print_leads(leads: &[LeadRecord], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(&leads),
        OutputFormat::Text => {
            let lines: Vec<String> = leads.iter().map(format_lead_line).collect();
            print_lines(&lines);
            Ok(())
        }
    }
}

pub fn list(
    cache: &LeadCache,
    status: Option<&str>,
    dirty: bool,
    output: OutputFormat,
) -> Result<()> {
    let leads = list_impl(cache, status, dirty)?;
    print_leads(&leads, output)
}

pub(crate) fn list_impl(
    cache: &LeadCache,
    status: Option<&str>,
    dirty: bool,
) -> Result<Vec<LeadRecord>> {
    let mut leads = match status {
        Some(status) => cache.get_by_status(status)?,
        None => cache.database().all()?,
    };
    if dirty {
        leads.retain(|lead| lead.dirty);
    }
    Ok(leads)
}

pub fn search(cache: &LeadCache, query: &str, output: OutputFormat) -> Result<()> {
    let leads = cache.search(query)?;
    print_leads(&leads, output)
}

pub fn show(cache: &LeadCache, id: i64) -> Result<()> {
    print_json(&cache.get(id)?)
}

pub fn add(cache: &LeadCache, args: LeadArgs) -> Result<()> {
    let lead = add_impl(cache, args)?;
    println!("Added lead {}", lead.id);
    Ok(())
}

pub(crate) fn add_impl(cache: &LeadCache, args: LeadArgs) -> Result<LeadRecord> {
    let optional = [
        (LeadField::Company, args.company),
        (LeadField::Email, args.email),
        (LeadField::Title, args.title),
        (LeadField::LinkedinUrl, args.linkedin),
        (LeadField::Website, args.website),
        (LeadField::Status, args.status),
        (LeadField::Source, args.source),
    ];
    let mut patch = LeadPatch::new().set(LeadField::FullName, args.name.trim());
    for (field, value) in optional {
        if let Some(value) = value {
            patch.insert(field, Some(value));
        }
    }
    Ok(cache.create(&NewLead::new(patch))?)
}

/// Parse `field=value` into a patch entry. An empty value clears the field.
pub(crate) fn parse_assignment(assignment: &str) -> Result<(LeadField, Option<String>)> {
    let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| Error::InvalidAssignment(assignment.to_string()))?;
    let field: LeadField = name.trim().parse()?;
    let value = Some(value.to_string()).filter(|v| !v.trim().is_empty());
    Ok((field, value))
}

pub fn set(cache: &LeadCache, id: i64, assignments: &[String]) -> Result<()> {
    set_impl(cache, id, assignments)?;
    println!("Updated lead {id}");
    Ok(())
}

pub(crate) fn set_impl(cache: &LeadCache, id: i64, assignments: &[String]) -> Result<()> {
    let mut patch = LeadPatch::new();
    for assignment in assignments {
        let (field, value) = parse_assignment(assignment)?;
        patch.insert(field, value);
    }
    if !cache.update_patch(id, &patch)? {
        return Err(lead_core::Error::NotFound(id).into());
    }
    Ok(())
}

pub fn delete(cache: &LeadCache, id: i64) -> Result<()> {
    cache.delete(id)?;
    println!("Deleted lead {id}");
    Ok(())
}

pub fn dedup(cache: &LeadCache) -> Result<()> {
    let removed = cache.dedup_emails()?;
    if removed.is_empty() {
        println!("No duplicate emails");
    } else {
        let ids: Vec<String> = removed.iter().map(i64::to_string).collect();
        println!("Removed {} duplicate lead(s): {}", removed.len(), ids.join(", "));
    }
    Ok(())
}

#[cfg(test)]
#[path = "lead_tests.rs"]
mod tests;
