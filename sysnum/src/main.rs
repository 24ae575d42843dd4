use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use sysnum_core::{dump, x86_64, Arch, Entry, LookupError, Registry, SyscallTable, SysnoSet};

use config::{AppConfig, AppConfigBuilder, DumpFormat};

mod config;

/// Look up Linux syscall numbers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Syscall table to use [default: from the config file, else the host's]
    #[arg(short, long, global = true)]
    arch: Option<Arch>,

    /// Configuration file [default: ./sysnum.toml if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve names to numbers, and numbers (decimal or 0x hex) to names
    Lookup {
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Print the table, or a part of it
    Dump {
        #[arg(short, long)]
        format: Option<DumpFormat>,

        /// Only these syscalls (comma separated names)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Query {
    Number(u64),
    Name(String),
}

impl Query {
    fn parse(query: &str) -> Self {
        let number = match query.strip_prefix("0x").or_else(|| query.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => query.parse::<u64>().ok(),
        };
        match number {
            Some(number) => Query::Number(number),
            None => Query::Name(query.to_owned()),
        }
    }

    fn resolve(&self, registry: &Registry) -> Result<Entry, LookupError> {
        match self {
            Query::Number(number) => registry.entry_by_number(*number),
            Query::Name(name) => registry.entry_by_name(name),
        }
    }
}

fn resolve_arch(config: &AppConfig) -> Result<Arch> {
    match config.arch {
        Some(arch) => Ok(arch),
        None => Ok(Registry::host()
            .context("no --arch given and none configured")?
            .arch()),
    }
}

/// Answers every query, then fails if any of them did not resolve.
fn run_lookup(registry: &Registry, queries: &[String], out: &mut impl Write) -> Result<()> {
    let mut failed = 0;
    for query in queries {
        match Query::parse(query).resolve(registry) {
            Ok(entry) => writeln!(out, "{}\t{}", entry.name, entry.number)?,
            Err(e) => {
                log::error!("{}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} queries did not resolve", failed, queries.len());
    }
    Ok(())
}

fn render_dump(registry: &Registry, format: DumpFormat, only: &[String]) -> Result<String> {
    match registry.arch() {
        Arch::X86_64 => render_dump_of::<x86_64::Sysno>(format, only),
    }
}

fn render_dump_of<T: SyscallTable>(format: DumpFormat, only: &[String]) -> Result<String> {
    let set: SysnoSet<T> = if only.is_empty() {
        SysnoSet::all()
    } else {
        only.iter()
            .map(|name| name.trim().parse::<T>())
            .collect::<Result<_, _>>()?
    };
    log::info!("dumping {} of {} {} syscalls", set.len(), T::ALL.len(), T::ARCH);

    Ok(match format {
        DumpFormat::Table => dump::render_table(set.iter()),
        DumpFormat::Header => dump::render_c_header(set.iter()),
        DumpFormat::Yaml => serde_yaml::to_string(&set.iter().map(Entry::of).collect::<Vec<_>>())?,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfigBuilder::from_config(AppConfig::load(args.config.as_deref())?);
    if let Some(arch) = args.arch {
        config = config.with_arch(arch);
    }
    if let Command::Dump {
        format: Some(format),
        ..
    } = args.command
    {
        config = config.with_format(format);
    }
    let config = config.get();

    config.logger.init();
    log::debug!("{:?}", config);

    let registry = Registry::new(resolve_arch(&config)?);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Lookup { queries } => run_lookup(&registry, &queries, &mut out),
        Command::Dump { only, output, .. } => {
            let text = render_dump(&registry, config.format, &only)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text).with_context(|| format!("write {:?}", path))?;
                    log::info!("wrote {:?}", path);
                }
                None => out.write_all(text.as_bytes())?,
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_arguments() {
        let args = Args::parse_from(["sysnum", "--arch", "amd64", "dump", "--only", "read,write", "-f", "header"]);
        assert_eq!(args.arch, Some(Arch::X86_64));
        match args.command {
            Command::Dump { format, only, output } => {
                assert_eq!(format, Some(DumpFormat::Header));
                assert_eq!(only, vec!["read", "write"]);
                assert_eq!(output, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn query_parsing() {
        assert_eq!(Query::parse("257"), Query::Number(257));
        assert_eq!(Query::parse("0x101"), Query::Number(257));
        assert_eq!(Query::parse("openat"), Query::Name("openat".into()));
        assert_eq!(Query::parse("pread64"), Query::Name("pread64".into()));
        assert_eq!(Query::parse("0xzz"), Query::Name("0xzz".into()));
        assert_eq!(Query::parse("-1"), Query::Name("-1".into()));
    }

    #[test]
    fn lookup_prints_name_and_number() -> Result<()> {
        let registry = Registry::new(Arch::X86_64);
        let mut out = Vec::new();
        run_lookup(&registry, &["read".into(), "0x101".into(), "328".into()], &mut out)?;
        assert_eq!(String::from_utf8(out)?, "read\t0\nopenat\t257\npwritev2\t328\n");
        Ok(())
    }

    #[test]
    fn lookup_reports_misses_after_answering_the_rest() {
        let registry = Registry::new(Arch::X86_64);
        let mut out = Vec::new();
        let err = run_lookup(&registry, &["not_a_syscall".into(), "write".into(), "329".into()], &mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "2 of 3 queries did not resolve");
        assert_eq!(String::from_utf8(out).unwrap(), "write\t1\n");
    }

    #[test]
    fn dump_selection() -> Result<()> {
        let registry = Registry::new(Arch::X86_64);
        let only = vec!["write".to_owned(), "read".to_owned()];

        assert_eq!(render_dump(&registry, DumpFormat::Table, &only)?, "  0 read\n  1 write\n");
        assert_eq!(
            render_dump(&registry, DumpFormat::Yaml, &["brk".to_owned()])?,
            "- arch: x86_64\n  name: brk\n  number: 12\n"
        );
        assert!(render_dump(&registry, DumpFormat::Header, &[])?.ends_with("#endif /* _ASM_X86_UNISTD_64_H */"));
        Ok(())
    }

    #[test]
    fn dump_rejects_unknown_names() {
        let registry = Registry::new(Arch::X86_64);
        let err = render_dump(&registry, DumpFormat::Table, &["read".to_owned(), "sys_read".to_owned()]).unwrap_err();
        assert_eq!(err.to_string(), r#"unknown x86_64 syscall name: "sys_read""#);
    }

    #[test]
    fn configured_arch_wins_over_host() -> Result<()> {
        let config = AppConfigBuilder::new().with_arch(Arch::X86_64).get();
        assert_eq!(resolve_arch(&config)?, Arch::X86_64);
        Ok(())
    }
}
