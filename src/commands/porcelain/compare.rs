use crate::OutputFormat;
use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::compare::engine::{CompareRequest, Comparer};
use crate::artifacts::compare::enricher::EnrichOptions;
use crate::artifacts::compare::result::{
    CompareResult, ComparisonMode, EnrichedCommit, VerificationResult,
};
use crate::artifacts::identity::account::AccountDirectory;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub basehead: String,
    /// Overrides the branch HEAD points at as the default revision
    pub default_branch: Option<String>,
    pub include_commits: bool,
    pub enrich: EnrichOptions,
    pub workers: usize,
    pub format: OutputFormat,
}

impl Repository {
    pub async fn compare(
        &self,
        opts: &CompareOptions,
        directory: Arc<dyn AccountDirectory>,
    ) -> anyhow::Result<()> {
        let default_revision = match &opts.default_branch {
            Some(branch) => branch.clone(),
            None => self
                .refs()
                .default_branch()?
                .map(|branch| branch.to_string())
                .unwrap_or_else(|| HEAD_REF_NAME.to_string()),
        };

        let mut request = CompareRequest::new(opts.basehead.clone(), default_revision);
        if opts.include_commits {
            request = request.with_commits(opts.enrich);
        }

        let result = Comparer::new(self, directory)
            .with_workers(opts.workers)
            .compare(&request)
            .await?;

        match opts.format {
            OutputFormat::Json => self.print_json(&result),
            OutputFormat::Text => self.print_text(&result),
        }
    }

    fn print_json(&self, result: &CompareResult) -> anyhow::Result<()> {
        let mut writer = self.writer();
        serde_json::to_writer_pretty(&mut *writer, &result.to_response())?;
        writeln!(writer)?;

        Ok(())
    }

    fn print_text(&self, result: &CompareResult) -> anyhow::Result<()> {
        let separator = match result.mode() {
            ComparisonMode::AncestryRange => "...",
            ComparisonMode::DirectDiff => "..",
        };
        writeln!(
            self.writer(),
            "Comparing {}{separator}{} ({} .. {})",
            result.base().spec,
            result.head().spec,
            result.base().oid.to_short_oid(),
            result.head().oid.to_short_oid(),
        )?;

        if let Some(merge_base) = result.merge_base() {
            if merge_base.is_empty() {
                writeln!(self.writer(), "{}", "Histories are unrelated".red())?;
            } else {
                let oids = merge_base
                    .oids()
                    .iter()
                    .map(|oid| oid.to_short_oid())
                    .collect::<Vec<_>>();
                writeln!(self.writer(), "Merge base: {}", oids.join(", "))?;
            }
        }

        let total = result.total_commits();
        writeln!(
            self.writer(),
            "{total} {}",
            if total == 1 { "commit" } else { "commits" }
        )?;

        for commit in result.enriched().unwrap_or_default() {
            writeln!(self.writer())?;
            self.show_enriched_commit(commit)?;
        }

        Ok(())
    }

    fn show_enriched_commit(&self, enriched: &EnrichedCommit) -> anyhow::Result<()> {
        let commit = &enriched.commit;
        let mut writer = self.writer();

        writeln!(writer, "{}", format!("commit {}", commit.oid()).yellow())?;
        match &enriched.author_account {
            Some(account) => writeln!(
                writer,
                "Author: {} ({})",
                commit.author().display_name(),
                account.login
            )?,
            None => writeln!(writer, "Author: {}", commit.author().display_name())?,
        }
        writeln!(writer, "Date:   {}", commit.timestamp().to_rfc3339())?;
        writeln!(writer)?;
        writeln!(writer, "    {}", commit.short_message())?;

        if let (Some(insertions), Some(deletions)) = (enriched.insertions, enriched.deletions) {
            writeln!(
                writer,
                "    {} {}",
                format!("+{insertions}").green(),
                format!("-{deletions}").red()
            )?;
        }
        if let Some(files) = &enriched.files_changed {
            for file in files {
                writeln!(writer, "    {file}")?;
            }
        }
        match &enriched.verification {
            Some(VerificationResult::Verified { signer }) => writeln!(
                writer,
                "    {} {} ({})",
                "Good signature from".green(),
                signer.principal,
                signer.fingerprint
            )?,
            Some(VerificationResult::Unverified { reason }) => {
                writeln!(writer, "    {} {reason}", "Bad signature:".red())?
            }
            Some(VerificationResult::NotSigned) => writeln!(writer, "    No signature")?,
            None => {}
        }

        Ok(())
    }
}
