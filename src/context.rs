//! Settings for running the embedded engine against a local base directory.
//!
//! The context configures both the MR and Tez execution engines; nothing in
//! them conflicts, so a script can switch engines with
//! `set hive.execution.engine=tez;`.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

const DERBY_DRIVER: &str = "org.apache.derby.jdbc.EmbeddedDriver";

/// Folders created under the base directory, with the setting each backs.
const FOLDER_SETTINGS: &[(&str, &str)] = &[
    ("hive.metastore.warehouse.dir", "warehouse"),
    ("hive.exec.scratchdir", "scratchdir"),
    ("hive.exec.local.scratchdir", "localscratchdir"),
    ("hive.querylog.location", "tmp"),
    ("hadoop.tmp.dir", "hadooptmp"),
    ("test.log.dir", "logs"),
];

/// Tez uploads its jars here; shared by both install settings.
const TEZ_INSTALL_FOLDER: &str = "tez_installation_dir";

/// Errors that can occur when setting up a context.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Engine settings plus the folder layout they point at.
#[derive(Debug, Clone, Serialize)]
pub struct EngineContext {
    basedir: PathBuf,
    metastore_url: String,
    settings: BTreeMap<String, String>,
    system_properties: BTreeMap<String, String>,
}

impl EngineContext {
    /// Build the context under `basedir`, creating its folders.
    ///
    /// `overrides` are applied last and win over every default.
    pub fn init(
        basedir: &Path,
        overrides: &BTreeMap<String, String>,
    ) -> Result<Self, ContextError> {
        let mut ctx = Self {
            basedir: basedir.to_path_buf(),
            metastore_url: format!("jdbc:derby:memory:{}", Uuid::new_v4()),
            settings: BTreeMap::new(),
            system_properties: BTreeMap::new(),
        };

        ctx.configure_misc();
        ctx.configure_metastore();
        ctx.configure_mr_engine();
        ctx.configure_tez_engine();
        ctx.configure_security_realm();
        ctx.set("hive.support.concurrency", "false");
        ctx.configure_file_system()?;

        for (key, value) in overrides {
            ctx.set(key, value);
        }

        Ok(ctx)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn settings(&self) -> &BTreeMap<String, String> {
        &self.settings
    }

    /// Process-wide properties the engine expects (krb5, Derby log).
    pub fn system_properties(&self) -> &BTreeMap<String, String> {
        &self.system_properties
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// The in-memory metastore URL, unique per context.
    pub fn metastore_url(&self) -> &str {
        &self.metastore_url
    }

    fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.insert(key.into(), value.into());
    }

    fn configure_misc(&mut self) {
        self.set("hive.stats.autogather", "false");
        // Keeps the optimizer off the calcite library.
        self.set("hive.cbo.enable", "false");
        // Avoids a cleanup exception when the session stops.
        self.set("hive.server2.logging.operation.enabled", "false");
        self.set("hadoop.bin.path", "NO_BIN!");
    }

    fn configure_metastore(&mut self) {
        let derby_log = self.basedir.join("derby.log");
        self.system_properties.insert(
            "derby.stream.error.file".to_string(),
            derby_log.display().to_string(),
        );

        self.set("datanucleus.schema.autoCreateAll", "true");
        self.set("hive.metastore.schema.verification", "false");
        self.set("datanucleus.connectiondrivername", DERBY_DRIVER);
        self.set("javax.jdo.option.ConnectionDriverName", DERBY_DRIVER);
        // No pooling; saves a lot of threads.
        self.set("datanucleus.connectionPoolingType", "None");
        self.set("hive.metastore.validateConstraints", "true");
        self.set("hive.metastore.validateColumns", "true");
        self.set("hive.metastore.validateTables", "true");
    }

    fn configure_mr_engine(&mut self) {
        // Optimizers off, otherwise map reduce escapes the process.
        self.set("hive.exec.infer.bucket.sort", "false");
        self.set("hive.optimize.metadataonly", "false");
        self.set("hive.optimize.index.filter", "false");
        self.set("hive.auto.convert.join", "false");
        self.set("hive.optimize.skewjoin", "false");
        // Counter polling defaults to 1000ms.
        self.set("hive.exec.counters.pull.interval", "1");
        self.set("hive.rpc.query.plan", "true");
    }

    fn configure_tez_engine(&mut self) {
        self.set("tez.local.mode", "true");
        self.set("fs.defaultFS", "file:///");
        self.set("tez.runtime.optimize.local.fetch", "true");
        // Offline runs.
        self.set("tez.am.disable.client-version-check", "true");

        self.set("tez.am.use.concurrent-dispatcher", "false");
        self.set("tez.am.container.reuse.enabled", "false");
        self.set("tez.dag.recovery.enabled", "false");
        self.set("tez.task.get-task.sleep.interval-ms.max", "1");
        self.set("tez.am.tez-ui.webservice.enable", "false");
        self.set("tez.am.node-blacklisting.enabled", "false");
    }

    fn configure_security_realm(&mut self) {
        // Skips the realm lookup and its ~5s timeout.
        for (key, value) in [
            ("java.security.krb5.realm", ""),
            ("java.security.krb5.kdc", ""),
            ("java.security.krb5.conf", "/dev/null"),
        ] {
            self.system_properties
                .insert(key.to_string(), value.to_string());
        }
    }

    fn configure_file_system(&mut self) -> Result<(), ContextError> {
        let url = format!("{};create=true", self.metastore_url);
        self.set("javax.jdo.option.ConnectionURL", url);

        for (key, folder) in FOLDER_SETTINGS {
            let path = self.new_folder(folder)?;
            self.set(*key, path);
        }
        self.set("hive.warehouse.subdir.inherit.perms", "true");

        let install_dir = self.new_folder(TEZ_INSTALL_FOLDER)?;
        self.set("hive.jar.directory", install_dir.clone());
        self.set("hive.user.install.directory", install_dir);

        Ok(())
    }

    /// Create a folder under the base directory and return its absolute path.
    fn new_folder(&self, name: &str) -> Result<String, ContextError> {
        let path = self.basedir.join(name);
        fs::create_dir_all(&path).map_err(|e| ContextError::CreateDir {
            path: path.clone(),
            source: e,
        })?;
        let path = path.canonicalize().unwrap_or(path);
        Ok(path.display().to_string())
    }
}
