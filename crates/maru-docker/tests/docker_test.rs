use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use maru_core::ProjectConfig;
use maru_docker::singularity::default_output;
use maru_docker::{
    CommandError, CommandExecutor, DockerClient, PushStep, RunOptions, SingularityClient,
};
use mockall::mock;

mock! {
    Executor {}

    impl CommandExecutor for Executor {
        async fn exec(&self, program: &str, args: &[String]) -> Result<String, CommandError>;
        async fn exec_streaming(&self, program: &str, args: &[String]) -> Result<(), CommandError>;
        async fn exec_interactive(&self, program: &str, args: &[String]) -> Result<(), CommandError>;
    }
}

type Calls = Arc<Mutex<Vec<Vec<String>>>>;

fn foo() -> ProjectConfig {
    ProjectConfig {
        name: "foo".to_owned(),
        version: "1.0.0".to_owned(),
        remotes: vec!["docker.io/acme".to_owned(), "ghcr.io/acme".to_owned()],
        ..Default::default()
    }
}

fn failed(program: &str, args: &[String]) -> CommandError {
    CommandError::Failed {
        program: program.to_owned(),
        args: args.to_vec(),
        detail: "exit status: 1".to_owned(),
    }
}

fn not_found(program: &str) -> CommandError {
    CommandError::NotFound {
        program: program.to_owned(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    }
}

// ── Build ──

#[tokio::test]
async fn build_runs_docker_with_sorted_build_args() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .times(1)
        .withf(|program, args| {
            program == "docker"
                && args
                    == [
                        "build",
                        "--build-arg",
                        "A=1",
                        "--build-arg",
                        "B=2",
                        "-t",
                        "foo:latest",
                        "-t",
                        "foo:1.0.0",
                        ".",
                    ]
        })
        .returning(|_, _| Ok(()));

    let mut config = foo();
    config.build_args.insert("B".to_owned(), "2".to_owned());
    config.build_args.insert("A".to_owned(), "1".to_owned());

    let client = DockerClient::with_executor(mock);
    client
        .build(&config, &BTreeMap::new(), Path::new("."))
        .await
        .unwrap();
}

#[tokio::test]
async fn build_failure_is_returned_to_caller() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .returning(|program, args| Err(failed(program, args)));

    let client = DockerClient::with_executor(mock);
    let err = client
        .build(&foo(), &BTreeMap::new(), Path::new("."))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Failed { ref program, .. } if program == "docker"));
}

// ── Push ──

fn recording_push_mock(fail_first_tag: bool, fail_first_push: bool) -> (MockExecutor, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let rec = Arc::clone(&calls);
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .times(4)
        .returning(move |program: &str, args: &[String]| {
            assert_eq!(program, "docker");
            rec.lock().unwrap().push(args.to_vec());
            let first_remote = args.last().is_some_and(|a| a.starts_with("docker.io/"));
            let fail = first_remote
                && ((args[0] == "tag" && fail_first_tag) || (args[0] == "push" && fail_first_push));
            if fail { Err(failed(program, args)) } else { Ok(()) }
        });
    (mock, calls)
}

#[tokio::test]
async fn push_tags_and_pushes_each_remote_in_order() {
    let (mock, calls) = recording_push_mock(false, false);
    let client = DockerClient::with_executor(mock);

    let report = client.push(&foo()).await;

    assert!(report.is_success());
    assert_eq!(
        report.pushed,
        ["docker.io/acme/foo:1.0.0", "ghcr.io/acme/foo:1.0.0"]
    );
    let calls = calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![
            vec!["tag", "foo:1.0.0", "docker.io/acme/foo:1.0.0"],
            vec!["push", "docker.io/acme/foo:1.0.0"],
            vec!["tag", "foo:1.0.0", "ghcr.io/acme/foo:1.0.0"],
            vec!["push", "ghcr.io/acme/foo:1.0.0"],
        ]
    );
}

#[tokio::test]
async fn push_continues_past_failed_tag() {
    let (mock, calls) = recording_push_mock(true, false);
    let client = DockerClient::with_executor(mock);

    let report = client.push(&foo()).await;

    assert_eq!(calls.lock().unwrap().len(), 4);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].remote, "docker.io/acme");
    assert_eq!(report.failures[0].step, PushStep::Tag);
}

#[tokio::test]
async fn push_continues_past_failed_push() {
    let (mock, calls) = recording_push_mock(false, true);
    let client = DockerClient::with_executor(mock);

    let report = client.push(&foo()).await;

    assert_eq!(calls.lock().unwrap().len(), 4);
    assert_eq!(report.pushed, ["ghcr.io/acme/foo:1.0.0"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].step, PushStep::Push);
}

#[tokio::test]
async fn push_without_remotes_runs_nothing() {
    let client = DockerClient::with_executor(MockExecutor::new());
    let mut config = foo();
    config.remotes.clear();

    let report = client.push(&config).await;

    assert!(report.is_success());
    assert!(report.pushed.is_empty());
}

// ── Run / Shell ──

#[tokio::test]
async fn run_attaches_stdin_and_forwards_args() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_interactive()
        .times(1)
        .withf(|program, args| {
            program == "docker"
                && args == ["run", "-i", "-e", "DEBUG=1", "foo:1.0.0", "--threads", "4"]
        })
        .returning(|_, _| Ok(()));

    let opts = RunOptions {
        env: vec!["DEBUG=1".to_owned()],
        user: None,
    };
    let extra = vec!["--threads".to_owned(), "4".to_owned()];
    DockerClient::with_executor(mock)
        .run(&foo(), &opts, &extra)
        .await
        .unwrap();
}

#[tokio::test]
async fn shell_uses_bash_entrypoint_and_user() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_interactive()
        .times(1)
        .withf(|_, args| {
            args == [
                "run",
                "-i",
                "-t",
                "--user",
                "root",
                "--entrypoint",
                "/bin/bash",
                "foo:1.0.0",
            ]
        })
        .returning(|_, _| Ok(()));

    let opts = RunOptions {
        env: Vec::new(),
        user: Some("root".to_owned()),
    };
    DockerClient::with_executor(mock)
        .shell(&foo(), &opts)
        .await
        .unwrap();
}

// ── Status ──

#[tokio::test]
async fn image_exists_maps_inspect_outcome() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(|program, args| program == "docker" && args[..2] == ["image", "inspect"])
        .times(1)
        .returning(|_, _| Ok("sha256:abc\n".to_owned()));
    assert!(DockerClient::with_executor(mock).image_exists(&foo()).await.unwrap());

    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .returning(|program, args| Err(failed(program, args)));
    assert!(!DockerClient::with_executor(mock).image_exists(&foo()).await.unwrap());

    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|program, _| Err(not_found(program)));
    assert!(matches!(
        DockerClient::with_executor(mock).image_exists(&foo()).await,
        Err(CommandError::NotFound { .. })
    ));
}

// ── Singularity ──

#[tokio::test]
async fn singularity_availability_uses_command_v() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(|program, args| program == "sh" && args == ["-c", "command -v singularity"])
        .returning(|_, _| Ok("/usr/local/bin/singularity\n".to_owned()));
    assert!(SingularityClient::with_executor(mock).is_available().await);

    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .returning(|program, args| Err(failed(program, args)));
    assert!(!SingularityClient::with_executor(mock).is_available().await);
}

#[tokio::test]
async fn singularity_build_converts_from_docker_daemon() {
    let config = foo();
    let out = default_output(&config, Path::new("/tmp"));
    assert_eq!(out, Path::new("/tmp/foo_1.0.0.sif"));

    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .times(1)
        .withf(|program, args| {
            program == "singularity"
                && args == ["build", "/tmp/foo_1.0.0.sif", "docker-daemon://foo:1.0.0"]
        })
        .returning(|_, _| Ok(()));

    SingularityClient::with_executor(mock)
        .build(&config, &out)
        .await
        .unwrap();
}

#[tokio::test]
async fn singularity_run_passes_env_and_args() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_interactive()
        .times(1)
        .withf(|program, args| {
            program == "singularity"
                && args == ["run", "--env", "A=1", "docker-daemon:foo:1.0.0", "input.tif"]
        })
        .returning(|_, _| Ok(()));

    SingularityClient::with_executor(mock)
        .run(&foo(), &["A=1".to_owned()], &["input.tif".to_owned()])
        .await
        .unwrap();
}
