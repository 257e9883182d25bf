//! Read-only handles onto the host application's data sources
//!
//! The diagnostics module does not control the host it runs inside; every
//! probe reads host state through one of these injected traits so tests can
//! substitute fakes. Nothing here mutates the host, with the single
//! documented exception of [`SceneSource::force_redraw`].

use crate::error::ProbeError;
use std::future::Future;
use std::pin::Pin;

/// Heap usage as reported by the host's process memory API
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryStats {
    pub used_bytes: u64,
    pub total_bytes: u64,
}

/// Active vs installed extension units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleCounts {
    pub active: u64,
    pub total: u64,
}

/// Domain entity counts exposed by the host's collections
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntityCounts {
    pub actors: u64,
    pub items: u64,
    pub journals: u64,
    pub scenes: u64,
    pub active_scene_tokens: u64,
    pub active_scene_unique_actors: u64,
}

/// Process memory API
#[cfg_attr(test, mockall::automock)]
pub trait MemorySource: Send + Sync {
    fn heap_stats(&self) -> Result<MemoryStats, ProbeError>;
}

/// Structure of the active document tree
#[cfg_attr(test, mockall::automock)]
pub trait DocumentSource: Send + Sync {
    fn element_count(&self) -> Result<u64, ProbeError>;
}

/// Event-hook callback registry, counts grouped by owning extension
#[cfg_attr(test, mockall::automock)]
pub trait HookRegistry: Send + Sync {
    fn callbacks_per_extension(&self) -> Result<Vec<(String, u64)>, ProbeError>;
}

/// Patch registrations of the optional third-party patching facility
#[cfg_attr(test, mockall::automock)]
pub trait PatchRegistry: Send + Sync {
    fn patches_per_extension(&self) -> Result<Vec<(String, u64)>, ProbeError>;
}

/// Cross-process message handlers of the optional messaging facility
#[cfg_attr(test, mockall::automock)]
pub trait MessageRegistry: Send + Sync {
    fn handlers_per_extension(&self) -> Result<Vec<(String, u64)>, ProbeError>;
}

/// Extension/module registry
#[cfg_attr(test, mockall::automock)]
pub trait ModuleRegistry: Send + Sync {
    fn module_counts(&self) -> Result<ModuleCounts, ProbeError>;
}

/// Visual scene: entity counts plus the ability to force a full redraw
///
/// `force_redraw` is the one host-mutating operation in this crate; the
/// redraw-timing probe awaits it and measures the elapsed time.
pub trait SceneSource: Send + Sync {
    fn entity_counts(&self) -> Result<EntityCounts, ProbeError>;

    fn force_redraw<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<(), ProbeError>> + Send + 'a>>;
}

/// Memory source backed by the current process
///
/// Reads resident set size from procfs on Linux, with a `getrusage`
/// fallback elsewhere. Used by the demo binary; a real host deployment
/// injects its own [`MemorySource`].
pub struct SystemHost;

impl SystemHost {
    fn resident_bytes() -> Option<u64> {
        #[cfg(target_os = "linux")]
        {
            if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
                for line in status.lines() {
                    if line.starts_with("VmRSS:") {
                        if let Some(kb_str) = line.split_whitespace().nth(1) {
                            if let Ok(kb) = kb_str.parse::<u64>() {
                                return Some(kb * 1024);
                            }
                        }
                    }
                }
            }
        }

        #[cfg(unix)]
        unsafe {
            let mut usage = std::mem::zeroed();
            if libc::getrusage(libc::RUSAGE_SELF, &mut usage) == 0 {
                // ru_maxrss is in KB on Linux, bytes on macOS
                #[cfg(target_os = "macos")]
                return Some(usage.ru_maxrss as u64);

                #[cfg(not(target_os = "macos"))]
                return Some((usage.ru_maxrss as u64) * 1024);
            }
        }

        #[allow(unreachable_code)]
        None
    }

    fn total_bytes() -> Option<u64> {
        #[cfg(target_os = "linux")]
        {
            if let Ok(meminfo) = std::fs::read_to_string("/proc/meminfo") {
                for line in meminfo.lines() {
                    if line.starts_with("MemTotal:") {
                        if let Some(kb_str) = line.split_whitespace().nth(1) {
                            if let Ok(kb) = kb_str.parse::<u64>() {
                                return Some(kb * 1024);
                            }
                        }
                    }
                }
            }
        }

        None
    }
}

impl MemorySource for SystemHost {
    fn heap_stats(&self) -> Result<MemoryStats, ProbeError> {
        let used_bytes = Self::resident_bytes().ok_or_else(|| ProbeError::Unavailable {
            reason: "Not Supported".to_string(),
        })?;
        let total_bytes = Self::total_bytes().unwrap_or(used_bytes);
        Ok(MemoryStats {
            used_bytes,
            total_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_host_reports_nonzero_memory() {
        let stats = SystemHost.heap_stats().unwrap();
        assert!(stats.used_bytes > 0);
        assert!(stats.total_bytes >= stats.used_bytes);
    }

    #[test]
    fn test_mock_memory_source_restriction() {
        let mut mock = MockMemorySource::new();
        mock.expect_heap_stats().returning(|| {
            Err(ProbeError::Unavailable {
                reason: "Browser Restricted".to_string(),
            })
        });

        let err = mock.heap_stats().unwrap_err();
        assert_eq!(err.marker(), "Unavailable (Browser Restricted)");
    }
}
