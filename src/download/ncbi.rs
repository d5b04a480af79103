//! Minimal NCBI Entrez client for locating assembly proteomes.

use std::io::{BufReader, Write};
use std::time::Duration;

use flate2::read::MultiGzDecoder;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::download::{rewrite_proteome, species_prefix, DownloadError};

const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(Debug, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Entrez assembly query for a complete genome of `organism`
#[must_use]
pub fn assembly_query(organism: &str, refseq_only: bool) -> String {
    let mut query = format!("\"{organism}\"[Organism] AND \"complete genome\"[Assembly Level]");
    if refseq_only {
        query.push_str(" AND \"latest RefSeq\"[Filter]");
    }
    query
}

/// Pick the RefSeq FTP path of assembly `uid` from an esummary response,
/// falling back to GenBank.
#[must_use]
pub fn ftp_path_from_summary(summary: &serde_json::Value, uid: &str) -> Option<String> {
    let doc = summary.get("result")?.get(uid)?;
    ["ftppath_refseq", "ftppath_genbank"]
        .iter()
        .filter_map(|key| doc.get(*key).and_then(serde_json::Value::as_str))
        .find(|path| !path.is_empty())
        .map(str::to_string)
}

/// `ftp://.../GCF_000005845.2_ASM584v2` ->
/// `https://.../GCF_000005845.2_ASM584v2/GCF_000005845.2_ASM584v2_protein.faa.gz`
#[must_use]
pub fn protein_url(ftp_path: &str) -> Option<String> {
    let base = ftp_path.trim_end_matches('/');
    let folder = base.rsplit('/').next().filter(|f| !f.is_empty())?;
    let base = base
        .strip_prefix("ftp://")
        .map_or_else(|| base.to_string(), |rest| format!("https://{rest}"));
    Some(format!("{base}/{folder}_protein.faa.gz"))
}

pub struct EntrezClient {
    client: Client,
    email: Option<String>,
    tool: String,
}

impl EntrezClient {
    /// # Errors
    ///
    /// Returns `DownloadError::Http` if the HTTP client cannot be built.
    pub fn new(config: &PipelineConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", config.entrez_tool, env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(600))
            .build()?;

        Ok(Self {
            client,
            email: config.entrez_email.clone(),
            tool: config.entrez_tool.clone(),
        })
    }

    fn eutils_params<'a>(&'a self, extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        let mut params = extra.to_vec();
        params.push(("retmode", "json"));
        params.push(("tool", self.tool.as_str()));
        if let Some(email) = &self.email {
            params.push(("email", email.as_str()));
        }
        params
    }

    fn search_assembly(&self, term: &str) -> Result<Option<String>, DownloadError> {
        let params = self.eutils_params(&[("db", "assembly"), ("term", term), ("retmax", "1")]);
        let response: ESearchResponse = self
            .client
            .get(format!("{EUTILS_BASE}/esearch.fcgi"))
            .query(&params)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.esearchresult.idlist.into_iter().next())
    }

    /// Assembly uid for the organism's complete genome, preferring RefSeq
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::NoAssembly` if neither query finds a match.
    pub fn find_assembly(&self, organism: &str) -> Result<String, DownloadError> {
        if let Some(uid) = self.search_assembly(&assembly_query(organism, true))? {
            return Ok(uid);
        }
        info!("  No RefSeq found, trying general search...");
        self.search_assembly(&assembly_query(organism, false))?
            .ok_or_else(|| DownloadError::NoAssembly(organism.to_string()))
    }

    /// # Errors
    ///
    /// Returns `DownloadError::NoFtpPath` if the summary lists no FTP path.
    pub fn assembly_ftp_path(&self, uid: &str) -> Result<String, DownloadError> {
        let params = self.eutils_params(&[("db", "assembly"), ("id", uid)]);
        let summary: serde_json::Value = self
            .client
            .get(format!("{EUTILS_BASE}/esummary.fcgi"))
            .query(&params)
            .send()?
            .error_for_status()?
            .json()?;

        ftp_path_from_summary(&summary, uid).ok_or_else(|| DownloadError::NoFtpPath(uid.to_string()))
    }

    /// Fetch the organism's proteome and append it, renamed, to `out`.
    ///
    /// The whole proteome is decoded before anything is written, so a failed
    /// transfer leaves `out` untouched.
    ///
    /// # Errors
    ///
    /// Returns a `DownloadError` if any lookup or transfer step fails.
    pub fn fetch_proteome<W: Write>(&self, organism: &str, out: &mut W) -> Result<usize, DownloadError> {
        let uid = self.find_assembly(organism)?;
        let ftp_path = self.assembly_ftp_path(&uid)?;
        let url = protein_url(&ftp_path)
            .ok_or_else(|| DownloadError::Entrez(format!("malformed FTP path '{ftp_path}'")))?;

        info!("  Downloading proteome...");
        debug!("  {url}");
        let response = self.client.get(&url).send()?.error_for_status()?;

        let mut buffer = Vec::new();
        let reader = BufReader::new(MultiGzDecoder::new(response));
        let count = rewrite_proteome(reader, &species_prefix(organism), &mut buffer)?;

        out.write_all(&buffer)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_query() {
        assert_eq!(
            assembly_query("Escherichia coli", true),
            "\"Escherichia coli\"[Organism] AND \"complete genome\"[Assembly Level] AND \"latest RefSeq\"[Filter]"
        );
        assert!(!assembly_query("Escherichia coli", false).contains("RefSeq"));
    }

    #[test]
    fn test_protein_url() {
        assert_eq!(
            protein_url("ftp://ftp.ncbi.nlm.nih.gov/genomes/all/GCF/000/005/845/GCF_000005845.2_ASM584v2").unwrap(),
            "https://ftp.ncbi.nlm.nih.gov/genomes/all/GCF/000/005/845/GCF_000005845.2_ASM584v2/GCF_000005845.2_ASM584v2_protein.faa.gz"
        );
        assert_eq!(
            protein_url("https://host/dir/ASM1/").unwrap(),
            "https://host/dir/ASM1/ASM1_protein.faa.gz"
        );
        assert!(protein_url("").is_none());
    }

    #[test]
    fn test_ftp_path_prefers_refseq() {
        let summary = serde_json::json!({
            "result": {
                "uids": ["42"],
                "42": {
                    "ftppath_refseq": "ftp://host/refseq/A",
                    "ftppath_genbank": "ftp://host/genbank/A"
                }
            }
        });
        assert_eq!(
            ftp_path_from_summary(&summary, "42").as_deref(),
            Some("ftp://host/refseq/A")
        );
    }

    #[test]
    fn test_ftp_path_falls_back_to_genbank() {
        let summary = serde_json::json!({
            "result": { "7": { "ftppath_refseq": "", "ftppath_genbank": "ftp://host/gb/B" } }
        });
        assert_eq!(
            ftp_path_from_summary(&summary, "7").as_deref(),
            Some("ftp://host/gb/B")
        );
        assert!(ftp_path_from_summary(&summary, "8").is_none());
    }
}
