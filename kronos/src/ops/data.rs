use std::sync::Arc;

use kronos_core::{
    ColumnHints, DataFile, DataInfo, RawTable, Timeframe, ValidatedTable, detect_timeframe,
    list_data_files, normalize_table, summarize,
};
use kronos_types::{KronosError, Resource};

use crate::Kronos;

impl Kronos {
    /// Normalize `raw` and make it the current dataset.
    ///
    /// Normalization runs before any lock is taken; the previous dataset is
    /// replaced only when it succeeds.
    ///
    /// # Errors
    /// Returns `MissingColumns` or `Schema` when `raw` cannot be normalized.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kronos::data::load_table",
            skip(self, raw, hints),
            fields(rows = raw.row_count()),
            err,
        )
    )]
    pub async fn load_table(&self, raw: RawTable, hints: &ColumnHints) -> Result<DataInfo, KronosError> {
        let table = normalize_table(raw, hints)?;
        Ok(self.replace_dataset(table).await)
    }

    /// Read a CSV, Parquet or Feather file and make it the current dataset.
    ///
    /// The extension must be one of the configured `allowed_extensions` and the
    /// file must not exceed `max_file_size`. Reading and normalization run on
    /// the blocking pool.
    ///
    /// # Errors
    /// - `InvalidArg` for a disallowed extension or an oversized file.
    /// - `Io` when the file is missing or unreadable.
    /// - `MissingColumns` / `Schema` when its contents cannot be normalized.
    #[cfg(feature = "dataframe")]
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "kronos::data::load_file",
            skip(self, path),
            fields(path = %path.as_ref().display()),
            err,
        )
    )]
    pub async fn load_file(&self, path: impl AsRef<std::path::Path>) -> Result<DataInfo, KronosError> {
        let path = path.as_ref().to_path_buf();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !self.cfg.allows_extension(ext) {
            return Err(KronosError::InvalidArg(format!(
                "unsupported file format: {:?}",
                path.display().to_string()
            )));
        }
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| KronosError::Io(format!("{}: {e}", path.display())))?;
        if meta.len() > self.cfg.max_file_size {
            return Err(KronosError::InvalidArg(format!(
                "file is {} bytes, limit is {}",
                meta.len(),
                self.cfg.max_file_size
            )));
        }

        let table = tokio::task::spawn_blocking(move || {
            let raw = kronos_core::read_table(&path)?;
            normalize_table(raw, &ColumnHints::new())
        })
        .await
        .map_err(|e| KronosError::Io(format!("file reader task failed: {e}")))??;
        Ok(self.replace_dataset(table).await)
    }

    async fn replace_dataset(&self, table: ValidatedTable) -> DataInfo {
        let info = summarize(&table);
        let mut guard = self.state.write().await;
        guard.dataset = Some(Arc::new(table));
        drop(guard);
        #[cfg(feature = "tracing")]
        tracing::info!(rows = info.rows, timeframe = %info.timeframe, "dataset loaded");
        info
    }

    /// Files in the configured data directory with an allowed extension,
    /// newest first.
    ///
    /// # Errors
    /// Returns `Io` when the directory exists but cannot be read.
    pub fn list_data_files(&self) -> Result<Vec<DataFile>, KronosError> {
        list_data_files(&self.cfg.data_dir, &self.cfg.allowed_extensions)
    }

    /// Returns true once a dataset has been loaded.
    pub async fn has_data(&self) -> bool {
        self.state.read().await.dataset.is_some()
    }

    /// Summary of the current dataset.
    ///
    /// # Errors
    /// Returns `NotReady(data)` before any dataset has been loaded.
    pub async fn data_info(&self) -> Result<DataInfo, KronosError> {
        let table = self.current_dataset().await?;
        Ok(summarize(&table))
    }

    /// Sampling interval label of the current dataset.
    ///
    /// # Errors
    /// Returns `NotReady(data)` before any dataset has been loaded.
    pub async fn detect_timeframe(&self) -> Result<Timeframe, KronosError> {
        let table = self.current_dataset().await?;
        Ok(detect_timeframe(table.timestamps()))
    }

    /// Shared handle to the current dataset.
    ///
    /// # Errors
    /// Returns `NotReady(data)` before any dataset has been loaded.
    pub async fn current_dataset(&self) -> Result<Arc<ValidatedTable>, KronosError> {
        self.state
            .read()
            .await
            .dataset
            .clone()
            .ok_or(KronosError::not_ready(Resource::Data))
    }
}
