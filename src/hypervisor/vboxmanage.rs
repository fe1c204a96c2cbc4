use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use regex::Regex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use uuid::Uuid;

use super::control::{HypervisorControl, SnapshotProgress};
use super::types::{MachineState, SnapshotInfo, VmHandle};
use crate::configuration::LockMode;
use crate::error_handling::types::HypervisorError;
use crate::process_invoker::{ExternalTool, ProcessInvoker, ToolInvocation, ToolOutput};

/// Drives VirtualBox through the `VBoxManage` command-line front end.
///
/// Design notes:
/// - Lookups parse `showvminfo --machinereadable` and `list vms`.
/// - `VBoxManage` has no notion of a client-held session lock that survives
///   between invocations, so capture sessions are serialized with lock files
///   under `lock_dir`, one per machine UUID, created with create-new
///   semantics. A second capture of the same machine fails immediately.
/// - `snapshot take` is spawned directly rather than through the invoker so
///   its `NN%` progress output can be followed while it runs.
pub struct VBoxManageControl {
    program: PathBuf,
    lock_dir: PathBuf,
    invoker: Arc<dyn ProcessInvoker>,
}

impl VBoxManageControl {
    pub fn new(
        program: impl Into<PathBuf>,
        lock_dir: impl Into<PathBuf>,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Self {
        Self {
            program: program.into(),
            lock_dir: lock_dir.into(),
            invoker,
        }
    }

    fn lock_path(&self, vm: &VmHandle) -> PathBuf {
        self.lock_dir.join(format!("{}.lock", vm.id))
    }

    async fn run(&self, args: &[&str]) -> Result<ToolOutput, HypervisorError> {
        let invocation = args.iter().fold(
            ToolInvocation::new(ExternalTool::HypervisorControl, &self.program),
            |inv, arg| inv.arg(*arg),
        );
        Ok(self.invoker.invoke(&invocation).await?)
    }

    async fn run_checked(&self, args: &[&str]) -> Result<String, HypervisorError> {
        let output = self.run(args).await?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(HypervisorError::CommandFailed(format!(
                "VBoxManage {} ({}): {}",
                args.join(" "),
                output.describe_status(),
                output.stderr.trim()
            )))
        }
    }

    async fn show_vm_info(&self, target: &str) -> Result<HashMap<String, String>, HypervisorError> {
        let output = self.run(&["showvminfo", target, "--machinereadable"]).await?;
        if !output.success() {
            return Err(HypervisorError::NotFound(format!(
                "{}: {}",
                target,
                output.stderr.trim()
            )));
        }
        Ok(parse_machine_readable(&output.stdout))
    }
}

#[async_trait]
impl HypervisorControl for VBoxManageControl {
    async fn find_by_name(&self, name: &str) -> Result<VmHandle, HypervisorError> {
        let info = self.show_vm_info(name).await?;
        handle_from_info(&info)
    }

    async fn find_by_uuid(&self, id: &str) -> Result<VmHandle, HypervisorError> {
        let listing = self.run_checked(&["list", "vms"]).await?;
        parse_vm_list(&listing)
            .into_iter()
            .find(|vm| vm.id.to_string().eq_ignore_ascii_case(id))
            .ok_or_else(|| HypervisorError::NotFound(id.to_string()))
    }

    async fn lock_machine(&self, vm: &VmHandle, mode: LockMode) -> Result<(), HypervisorError> {
        std::fs::create_dir_all(&self.lock_dir)?;
        let path = self.lock_path(vm);
        let held = || {
            HypervisorError::Locked(format!(
                "{} is held by another capture ({})",
                vm.name,
                path.display()
            ))
        };
        let mut file = match create_lock_file(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let Some(pid) = stale_lock_holder(&path) else {
                    warn!("{} is already locked ({})", vm, path.display());
                    return Err(held());
                };
                warn!(
                    "Reclaiming lock on {} left behind by exited process {} ({})",
                    vm,
                    pid,
                    path.display()
                );
                match std::fs::remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
                match create_lock_file(&path) {
                    Ok(f) => f,
                    // Another capture reclaimed it first.
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => return Err(held()),
                    Err(e) => return Err(e.into()),
                }
            }
            Err(e) => return Err(e.into()),
        };
        writeln!(
            file,
            "mode={:?} pid={} acquired={}",
            mode,
            std::process::id(),
            Utc::now().to_rfc3339()
        )?;
        debug!("Locked {} ({:?}) via {}", vm, mode, path.display());
        Ok(())
    }

    async fn unlock_machine(&self, vm: &VmHandle) -> Result<(), HypervisorError> {
        let path = self.lock_path(vm);
        std::fs::remove_file(&path)?;
        debug!("Unlocked {} ({})", vm, path.display());
        Ok(())
    }

    async fn machine_state(&self, vm: &VmHandle) -> Result<MachineState, HypervisorError> {
        let info = self.show_vm_info(&vm.id.to_string()).await?;
        let state = info
            .get("VMState")
            .ok_or_else(|| HypervisorError::ParseError("VMState missing".to_string()))?;
        Ok(MachineState::from_hypervisor(state))
    }

    async fn pause(&self, vm: &VmHandle) -> Result<(), HypervisorError> {
        if self.machine_state(vm).await? == MachineState::Paused {
            info!("{} is already paused", vm);
            return Ok(());
        }
        self.run_checked(&["controlvm", &vm.id.to_string(), "pause"])
            .await?;
        Ok(())
    }

    async fn resume(&self, vm: &VmHandle) -> Result<(), HypervisorError> {
        self.run_checked(&["controlvm", &vm.id.to_string(), "resume"])
            .await?;
        Ok(())
    }

    async fn take_snapshot(
        &self,
        vm: &VmHandle,
        name: &str,
        description: &str,
    ) -> Result<Box<dyn SnapshotProgress>, HypervisorError> {
        let mut child = Command::new(&self.program)
            .arg("snapshot")
            .arg(vm.id.to_string())
            .arg("take")
            .arg(name)
            .arg("--description")
            .arg(description)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn {}: {}", self.program.display(), e);
                HypervisorError::CommandFailed(format!("spawning snapshot: {}", e))
            })?;

        let percent = Arc::new(AtomicU8::new(0));
        let output = Arc::new(Mutex::new(String::new()));

        // VBoxManage prints "0%...10%..." on stderr without newlines.
        if let Some(stderr) = child.stderr.take() {
            let percent = Arc::clone(&percent);
            let output = Arc::clone(&output);
            let vm_name = vm.name.clone();
            tokio::spawn(async move {
                follow_progress(stderr, &percent, &output).await;
                debug!("snapshot progress monitoring ended for {}", vm_name);
            });
        }

        Ok(Box::new(VBoxSnapshotProgress {
            child,
            percent,
            output,
            completed: false,
        }))
    }

    async fn current_snapshot(&self, vm: &VmHandle) -> Result<SnapshotInfo, HypervisorError> {
        let info = self.show_vm_info(&vm.id.to_string()).await?;
        snapshot_from_info(&info)
    }
}

/// Progress of a running `VBoxManage snapshot take`.
///
/// The child is not killed on drop: once started, a snapshot is left to
/// complete inside VirtualBox.
struct VBoxSnapshotProgress {
    child: Child,
    percent: Arc<AtomicU8>,
    output: Arc<Mutex<String>>,
    completed: bool,
}

#[async_trait]
impl SnapshotProgress for VBoxSnapshotProgress {
    fn percent(&self) -> u8 {
        if self.completed {
            100
        } else {
            self.percent.load(Ordering::Relaxed)
        }
    }

    async fn wait(&mut self, poll: Duration) -> Result<bool, HypervisorError> {
        if self.completed {
            return Ok(true);
        }
        match tokio::time::timeout(poll, self.child.wait()).await {
            Err(_) => Ok(false),
            Ok(Ok(status)) if status.success() => {
                self.completed = true;
                Ok(true)
            }
            Ok(Ok(status)) => {
                let text = self
                    .output
                    .lock()
                    .map(|t| t.trim().to_string())
                    .unwrap_or_default();
                Err(HypervisorError::CommandFailed(format!(
                    "snapshot exited with {}: {}",
                    status, text
                )))
            }
            Ok(Err(e)) => Err(e.into()),
        }
    }
}

fn create_lock_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// Returns the pid recorded in the lock file at `path` when that process no
/// longer exists. Unreadable files and live or unknown holders yield `None`.
fn stale_lock_holder(path: &Path) -> Option<u32> {
    let contents = std::fs::read_to_string(path).ok()?;
    let pid = contents
        .split_whitespace()
        .find_map(|field| field.strip_prefix("pid="))?
        .parse::<u32>()
        .ok()?;
    if pid == std::process::id() || process_alive(pid) {
        None
    } else {
        Some(pid)
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    let Ok(pid) = i32::try_from(pid) else {
        return false;
    };
    if pid <= 0 {
        return true;
    }
    // Signal 0 only checks that the process exists. EPERM means it does.
    let result = unsafe { libc::kill(pid, 0) };
    result == 0 || std::io::Error::last_os_error().raw_os_error() != Some(libc::ESRCH)
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Copies `reader` into `output` until EOF, keeping `percent` at the last
/// percentage seen.
async fn follow_progress<R>(mut reader: R, percent: &AtomicU8, output: &Mutex<String>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 512];
    // Digits at the end of a chunk may belong to a percentage finished by the
    // next read.
    let mut carry = String::new();
    while let Ok(n) = reader.read(&mut buf).await {
        if n == 0 {
            break;
        }
        let chunk = String::from_utf8_lossy(&buf[..n]);
        let scan = format!("{}{}", carry, chunk);
        if let Some(p) = last_percent(&scan) {
            percent.store(p, Ordering::Relaxed);
        }
        carry = trailing_digits(&scan).to_string();
        if let Ok(mut text) = output.lock() {
            text.push_str(&chunk);
        }
    }
}

/// Parses `key="value"` / `"key"="value"` lines into a map.
pub(crate) fn parse_machine_readable(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (unquote(k).to_string(), unquote(v).to_string()))
        .collect()
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// Parses `"name" {uuid}` lines from `VBoxManage list vms`.
pub(crate) fn parse_vm_list(output: &str) -> Vec<VmHandle> {
    static LINE: OnceLock<Regex> = OnceLock::new();
    let re = LINE.get_or_init(|| {
        Regex::new(r#"^"(.*)" \{([0-9a-fA-F-]{36})\}$"#).expect("valid vm list regex")
    });
    output
        .lines()
        .filter_map(|line| re.captures(line.trim()))
        .filter_map(|caps| {
            let id = Uuid::parse_str(&caps[2]).ok()?;
            Some(VmHandle::new(&caps[1], id))
        })
        .collect()
}

fn trailing_digits(text: &str) -> &str {
    let digits = text.bytes().rev().take_while(u8::is_ascii_digit).count().min(3);
    &text[text.len() - digits..]
}

fn last_percent(chunk: &str) -> Option<u8> {
    static PERCENT: OnceLock<Regex> = OnceLock::new();
    let re = PERCENT.get_or_init(|| Regex::new(r"(\d{1,3})%").expect("valid percent regex"));
    re.captures_iter(chunk)
        .filter_map(|caps| caps[1].parse::<u8>().ok())
        .filter(|p| *p <= 100)
        .last()
}

fn handle_from_info(info: &HashMap<String, String>) -> Result<VmHandle, HypervisorError> {
    let name = info
        .get("name")
        .ok_or_else(|| HypervisorError::ParseError("name missing".to_string()))?;
    let id = info
        .get("UUID")
        .ok_or_else(|| HypervisorError::ParseError("UUID missing".to_string()))?;
    let id = Uuid::parse_str(id)
        .map_err(|e| HypervisorError::ParseError(format!("bad UUID {}: {}", id, e)))?;
    Ok(VmHandle::new(name.as_str(), id))
}

fn snapshot_from_info(info: &HashMap<String, String>) -> Result<SnapshotInfo, HypervisorError> {
    let id = info
        .get("CurrentSnapshotUUID")
        .ok_or_else(|| HypervisorError::NotFound("machine has no current snapshot".to_string()))?;
    let name = info.get("CurrentSnapshotName").cloned().unwrap_or_default();

    // CurrentSnapshotNode names the key of the current snapshot's name, e.g.
    // "SnapshotName-1-1"; its description sits under the matching suffix.
    let description = info
        .get("CurrentSnapshotNode")
        .and_then(|node| node.strip_prefix("SnapshotName"))
        .and_then(|suffix| info.get(&format!("SnapshotDescription{}", suffix)))
        .cloned()
        .unwrap_or_default();

    let snapshot_folder = info
        .get("SnapFldr")
        .map(|p| Path::new(p).to_path_buf())
        .unwrap_or_default();

    Ok(SnapshotInfo {
        id: id.clone(),
        name,
        description,
        parent_disk_ref: id.clone(),
        snapshot_folder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process_invoker::mock::{exited, printed, MockInvoker};

    const VM_UUID: &str = "2b7ce1f4-91b0-4a4e-8a43-0f3d1f6f2d11";

    fn showvminfo(state: &str) -> String {
        format!(
            "name=\"testvm1\"\nUUID=\"{}\"\nVMState=\"{}\"\nSnapFldr=\"/vms/testvm1/Snapshots\"\n\
             SnapshotName=\"Base\"\nSnapshotUUID=\"aaaa\"\nSnapshotDescription=\"first\"\n\
             SnapshotName-1=\"Forensic Save\"\nSnapshotUUID-1=\"bbbb\"\n\
             SnapshotDescription-1=\"Taken @UTC 2024-05-01T10:00:00.000000Z\"\n\
             CurrentSnapshotName=\"Forensic Save\"\nCurrentSnapshotUUID=\"bbbb\"\n\
             CurrentSnapshotNode=\"SnapshotName-1\"\n",
            VM_UUID, state
        )
    }

    fn backend(invoker: MockInvoker, lock_dir: &Path) -> (VBoxManageControl, Arc<MockInvoker>) {
        let invoker = Arc::new(invoker);
        let control = VBoxManageControl::new("VBoxManage", lock_dir, invoker.clone());
        (control, invoker)
    }

    #[test]
    fn parses_machine_readable_output() {
        let info = parse_machine_readable(&showvminfo("running"));
        assert_eq!(info["name"], "testvm1");
        assert_eq!(info["VMState"], "running");
        assert_eq!(info["SnapshotDescription-1"], "Taken @UTC 2024-05-01T10:00:00.000000Z");
    }

    #[test]
    fn current_snapshot_uses_the_current_node_description() {
        let info = parse_machine_readable(&showvminfo("running"));
        let snapshot = snapshot_from_info(&info).unwrap();
        assert_eq!(snapshot.id, "bbbb");
        assert_eq!(snapshot.name, "Forensic Save");
        assert_eq!(snapshot.description, "Taken @UTC 2024-05-01T10:00:00.000000Z");
        assert_eq!(snapshot.parent_disk_ref, "bbbb");
        assert_eq!(snapshot.snapshot_folder, PathBuf::from("/vms/testvm1/Snapshots"));
    }

    #[test]
    fn parses_vm_list() {
        let listing = format!("\"testvm1\" {{{}}}\n\"other vm\" {{not-a-uuid}}\n", VM_UUID);
        let vms = parse_vm_list(&listing);
        assert_eq!(vms.len(), 1);
        assert_eq!(vms[0].name, "testvm1");
        assert_eq!(vms[0].id.to_string(), VM_UUID);
    }

    #[test]
    fn picks_last_progress_percentage() {
        assert_eq!(last_percent("0%...10%...20%"), Some(20));
        assert_eq!(last_percent("...100%\n"), Some(100));
        assert_eq!(last_percent("Taking snapshot"), None);
    }

    #[tokio::test]
    async fn progress_follows_chunked_stderr() {
        let stderr = tokio_test::io::Builder::new()
            .read(b"0%...10%...")
            .read(b"20%...30%")
            .read(b"...100%\n")
            .build();
        let percent = AtomicU8::new(0);
        let output = Mutex::new(String::new());

        follow_progress(stderr, &percent, &output).await;

        assert_eq!(percent.load(Ordering::Relaxed), 100);
        assert_eq!(output.lock().unwrap().as_str(), "0%...10%...20%...30%...100%\n");
    }

    #[tokio::test]
    async fn progress_split_across_reads_is_not_lost() {
        let stderr = tokio_test::io::Builder::new()
            .read(b"0%...1")
            .read(b"0%...")
            .read(b"2")
            .read(b"0")
            .build();
        let percent = AtomicU8::new(0);
        let output = Mutex::new(String::new());

        follow_progress(stderr, &percent, &output).await;

        assert_eq!(percent.load(Ordering::Relaxed), 10);
        assert_eq!(output.lock().unwrap().as_str(), "0%...10%...20");

        let stderr = tokio_test::io::Builder::new()
            .read(b"...9")
            .read(b"0")
            .read(b"%")
            .build();
        follow_progress(stderr, &percent, &output).await;
        assert_eq!(percent.load(Ordering::Relaxed), 90);
    }

    #[test]
    fn keeps_at_most_three_trailing_digits() {
        assert_eq!(trailing_digits("0%...10"), "10");
        assert_eq!(trailing_digits("...12345"), "345");
        assert_eq!(trailing_digits("10%"), "");
    }

    #[tokio::test]
    async fn finds_machine_by_name_and_uuid() {
        let dir = tempfile::tempdir().unwrap();
        let listing = format!("\"testvm1\" {{{}}}\n", VM_UUID);
        let invoker = MockInvoker::new().on(ExternalTool::HypervisorControl, move |inv| {
            match inv.args.first().map(String::as_str) {
                Some("showvminfo") if inv.args[1] == "testvm1" => Ok(printed(&showvminfo("running"))),
                Some("list") => Ok(printed(&listing)),
                _ => Ok(exited(1)),
            }
        });
        let (control, _) = backend(invoker, dir.path());

        let by_name = control.find_by_name("testvm1").await.unwrap();
        assert_eq!(by_name.id.to_string(), VM_UUID);

        let by_uuid = control.find_by_uuid(VM_UUID).await.unwrap();
        assert_eq!(by_uuid, by_name);

        assert!(matches!(
            control.find_by_name("ghost").await,
            Err(HypervisorError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn pause_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = MockInvoker::new().on(ExternalTool::HypervisorControl, |inv| {
            match inv.args.first().map(String::as_str) {
                Some("showvminfo") => Ok(printed(&showvminfo("paused"))),
                _ => Ok(exited(0)),
            }
        });
        let (control, invoker) = backend(invoker, dir.path());
        let vm = VmHandle::new("testvm1", Uuid::parse_str(VM_UUID).unwrap());

        control.pause(&vm).await.unwrap();
        assert!(invoker
            .invocations()
            .iter()
            .all(|inv| inv.args.first().map(String::as_str) != Some("controlvm")));
    }

    #[tokio::test]
    async fn failed_resume_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = MockInvoker::new().on(ExternalTool::HypervisorControl, |_| {
            Ok(ToolOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: "VBOX_E_INVALID_VM_STATE".to_string(),
            })
        });
        let (control, _) = backend(invoker, dir.path());
        let vm = VmHandle::new("testvm1", Uuid::parse_str(VM_UUID).unwrap());

        match control.resume(&vm).await {
            Err(HypervisorError::CommandFailed(msg)) => assert!(msg.contains("VBOX_E_INVALID_VM_STATE")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn second_lock_fails_fast_until_released() {
        let dir = tempfile::tempdir().unwrap();
        let (control, _) = backend(MockInvoker::new(), dir.path());
        let vm = VmHandle::new("testvm1", Uuid::parse_str(VM_UUID).unwrap());

        control.lock_machine(&vm, LockMode::Shared).await.unwrap();
        assert!(matches!(
            control.lock_machine(&vm, LockMode::Exclusive).await,
            Err(HypervisorError::Locked(_))
        ));

        control.unlock_machine(&vm).await.unwrap();
        control.lock_machine(&vm, LockMode::Shared).await.unwrap();
        control.unlock_machine(&vm).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn lock_left_by_an_exited_process_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let (control, _) = backend(MockInvoker::new(), dir.path());
        let vm = VmHandle::new("testvm1", Uuid::parse_str(VM_UUID).unwrap());
        let path = dir.path().join(format!("{}.lock", VM_UUID));
        // Above the kernel's pid_max, so no such process can exist.
        std::fs::write(&path, "mode=Shared pid=99999999 acquired=2024-05-01T10:00:00+00:00\n").unwrap();

        control.lock_machine(&vm, LockMode::Shared).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains(&format!("pid={}", std::process::id())));
        control.unlock_machine(&vm).await.unwrap();
    }

    #[tokio::test]
    async fn lock_held_by_a_live_or_unknown_holder_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let (control, _) = backend(MockInvoker::new(), dir.path());
        let vm = VmHandle::new("testvm1", Uuid::parse_str(VM_UUID).unwrap());
        let path = dir.path().join(format!("{}.lock", VM_UUID));

        for contents in [
            format!("mode=Shared pid={} acquired=now\n", std::process::id()),
            "garbage\n".to_string(),
        ] {
            std::fs::write(&path, &contents).unwrap();
            assert!(matches!(
                control.lock_machine(&vm, LockMode::Shared).await,
                Err(HypervisorError::Locked(_))
            ));
            assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn snapshot_progress_follows_the_child_process() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-vboxmanage");
        std::fs::write(&script, "#!/bin/sh\nprintf '0%%...50%%...' >&2\nsleep 0.2\nprintf '100%%\\n' >&2\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let control = VBoxManageControl::new(&script, dir.path(), Arc::new(MockInvoker::new()));
        let vm = VmHandle::new("testvm1", Uuid::parse_str(VM_UUID).unwrap());

        let mut progress = control
            .take_snapshot(&vm, "Forensic Save", "Taken @UTC now")
            .await
            .unwrap();
        let mut done = false;
        for _ in 0..100 {
            if progress.wait(Duration::from_millis(50)).await.unwrap() {
                done = true;
                break;
            }
        }
        assert!(done);
        assert_eq!(progress.percent(), 100);
    }
}
