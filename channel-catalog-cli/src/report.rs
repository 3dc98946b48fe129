//! Text output for catalog listings.

use std::io::{self, Write};

use channel_catalog::{Catalog, ChannelId, EntryOutcome, LoadReport, Registered};

/// Print one line per failed or skipped entry, then the totals.
pub fn write_summary<W: Write>(w: &mut W, report: &LoadReport, catalog: &Catalog) -> io::Result<()> {
    let sections = [("channel", &report.channels), ("service", &report.services)];
    for (kind, outcomes) in sections {
        for (n, outcome) in outcomes.iter().enumerate() {
            match outcome {
                EntryOutcome::Skipped(e) => writeln!(w, "{} #{}: skipped ({})", kind, n + 1, e)?,
                EntryOutcome::BackendFailed { backend, error } => writeln!(
                    w,
                    "{} #{}: {} failed ({})",
                    kind,
                    n + 1,
                    backend.as_deref().unwrap_or("backend"),
                    error
                )?,
                EntryOutcome::Registered(_) => {}
            }
        }
    }
    let transports = report
        .services
        .iter()
        .filter(|o| matches!(o, EntryOutcome::Registered(Registered::Transport(_))))
        .count();
    writeln!(
        w,
        "{} channels, {} groups, {} services registered ({} skipped, {} failed)",
        catalog.channel_count(),
        catalog.group_count(),
        transports,
        report.skipped(),
        report.backend_failed()
    )
}

/// One line per channel, in index order.
pub fn write_channels<W: Write>(w: &mut W, catalog: &Catalog) -> io::Result<()> {
    writeln!(w, "{:>5}  {:>10}  {:<24}  {:<24}  {:<16}  SERVICES", "INDEX", "TAG", "NAME", "SLUG", "GROUP")?;
    for (_, ch) in catalog.channels() {
        let group = catalog.group(ch.group()).map(|g| g.name()).unwrap_or("?");
        writeln!(
            w,
            "{:>5}  {:>10}  {:<24}  {:<24}  {:<16}  {}",
            ch.index(),
            ch.tag(),
            ch.name(),
            ch.sanitized_name(),
            group,
            ch.transports().len()
        )?;
    }
    Ok(())
}

/// Groups in set order with their members.
pub fn write_groups<W: Write>(w: &mut W, catalog: &Catalog) -> io::Result<()> {
    for (_, group) in catalog.groups() {
        let marker = if group.is_protected() { " (default)" } else { "" };
        writeln!(w, "{} [tag {}]{}", group.name(), group.tag(), marker)?;
        for &id in group.members() {
            if let Some(ch) = catalog.channel(id) {
                writeln!(w, "  {:>5}  {}", ch.index(), ch.name())?;
            }
        }
    }
    Ok(())
}

/// JSON array of channel snapshots.
pub fn write_channels_json<W: Write>(w: &mut W, catalog: &Catalog) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, &catalog.snapshot().channels)?;
    writeln!(w)
}

/// JSON array of group snapshots, without channel details.
pub fn write_groups_json<W: Write>(w: &mut W, catalog: &Catalog) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, &catalog.snapshot().groups)?;
    writeln!(w)
}

/// Details of one channel and its services.
pub fn write_channel<W: Write>(w: &mut W, catalog: &Catalog, id: ChannelId) -> io::Result<()> {
    let Some(ch) = catalog.channel(id) else {
        return Ok(());
    };
    writeln!(w, "Channel:  {}", ch.name())?;
    writeln!(w, "Slug:     {}", ch.sanitized_name())?;
    writeln!(w, "Index:    {}", ch.index())?;
    writeln!(w, "Tag:      {}", ch.tag())?;
    if let Some(group) = catalog.group(ch.group()) {
        writeln!(w, "Group:    {}", group.name())?;
    }
    if let Some(rundown) = ch.teletext_rundown() {
        writeln!(w, "Teletext: {}", rundown)?;
    }
    for t in catalog.channel_transports(id) {
        writeln!(w, "Service:  [{}] {} ({})", t.priority(), t.name(), t.backend())?;
        for st in t.streams() {
            writeln!(w, "          Stream [{}] - pid {}", st.describe(), st.pid)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use channel_catalog::{ConfigEntry, ConfigSource, TagAllocator};

    fn output(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::with_tags(TagAllocator::new(1));
        let news = catalog.get_or_create_channel("BBC News");
        let sport = catalog.get_or_create_channel("Sport");
        let group = catalog.get_or_create_group("Sports");
        catalog.set_group(sport, group);
        catalog.set_teletext_rundown(news, 192);
        catalog
    }

    #[test]
    fn test_write_channels() {
        let catalog = catalog();
        let out = output(|w| write_channels(w, &catalog));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("bbc-news"));
        assert!(lines[1].contains("Uncategorized"));
        assert!(lines[2].contains("Sports"));
    }

    #[test]
    fn test_write_groups() {
        let catalog = catalog();
        let out = output(|w| write_groups(w, &catalog));
        assert!(out.starts_with("Sports [tag 4]\n"));
        assert!(out.contains("Uncategorized [tag 1] (default)\n"));
    }

    #[test]
    fn test_write_groups_json() {
        let catalog = catalog();
        let out = output(|w| write_groups_json(w, &catalog));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let groups = value.as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["name"], "Sports");
        assert_eq!(groups[1]["protected"], true);
        assert!(!out.contains("sanitized_name"));
    }

    #[test]
    fn test_write_channels_json() {
        let catalog = catalog();
        let out = output(|w| write_channels_json(w, &catalog));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let channels = value.as_array().unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0]["sanitized_name"], "bbc-news");
        assert!(!out.contains("protected"));
    }

    #[test]
    fn test_write_channel() {
        let catalog = catalog();
        let id = catalog.find_channel("bbc news").unwrap();
        let out = output(|w| write_channel(w, &catalog, id));
        assert!(out.contains("Slug:     bbc-news"));
        assert!(out.contains("Teletext: 192"));
    }

    #[test]
    fn test_write_summary() {
        let mut catalog = Catalog::with_tags(TagAllocator::new(1));
        let source: ConfigSource = vec![
            ConfigEntry::new("channel").with("name", "News"),
            ConfigEntry::new("channel"),
            ConfigEntry::new("service").with("channel", "News"),
        ]
        .into_iter()
        .collect();
        let report = channel_catalog::Bootstrap::new().load(&mut catalog, &source);

        let out = output(|w| write_summary(w, &report, &catalog));
        assert!(out.contains("channel #2: skipped"));
        assert!(out.contains("service #1: backend failed"));
        assert!(out.ends_with("1 channels, 1 groups, 0 services registered (1 skipped, 1 failed)\n"));
    }
}
