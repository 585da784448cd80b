//! Tax summary and the server-rendered PDF report.

use crate::api::Backend;
use crate::api::error::ApiError;
use crate::consts::cli_consts::REPORTS_DIR;
use crate::models::ResumenTributario;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
pub struct ReportService {
    backend: Arc<dyn Backend>,
}

impl ReportService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    fn query(cliente_id: i64, anio: i32, mes: u32) -> Vec<(String, String)> {
        vec![
            ("clienteId".to_string(), cliente_id.to_string()),
            ("anio".to_string(), anio.to_string()),
            ("mes".to_string(), mes.to_string()),
        ]
    }

    pub async fn resumen(
        &self,
        cliente_id: i64,
        anio: i32,
        mes: u32,
    ) -> Result<ResumenTributario, ApiError> {
        let value = self
            .backend
            .get("reportes/resumen", &Self::query(cliente_id, anio, mes))
            .await?;
        match value {
            Value::Null => Ok(ResumenTributario {
                anio,
                mes,
                ..Default::default()
            }),
            value => Ok(serde_json::from_value(value)?),
        }
    }

    pub async fn pdf(&self, cliente_id: i64, anio: i32, mes: u32) -> Result<Vec<u8>, ApiError> {
        self.backend
            .download("reportes/pdf", &Self::query(cliente_id, anio, mes))
            .await
    }
}

/// `reporte-AAAA-MM.pdf` under `~/contadesk-reportes`.
pub fn default_report_path(anio: i32, mes: u32) -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "Home directory not found")
    })?;
    Ok(home.join(REPORTS_DIR).join(report_file_name(anio, mes)))
}

pub fn report_file_name(anio: i32, mes: u32) -> String {
    format!("reporte-{:04}-{:02}.pdf", anio, mes)
}

/// Writes the PDF, creating parent directories.
pub async fn save_pdf(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}
