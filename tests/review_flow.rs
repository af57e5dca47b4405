use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use copilot_review::application::ports::{
    ChatClient, ChatClientFactory, ConfigRepository, OutputWriter, PullRequestSource,
    PullRequestSourceFactory, Reporter,
};
use copilot_review::application::usecases::review_pr::ReviewPrUseCase;
use copilot_review::domain::error::ReviewError;
use copilot_review::domain::review::{Conversation, RunOptions};
use copilot_review::domain::target::PullRequestTarget;
use copilot_review::infrastructure::adapters::{FileOutputWriter, UrlTargetResolver};
use copilot_review::infrastructure::config::Config;

const DIFF: &str = "diff --git a/src/lib.rs b/src/lib.rs\n+fn fixed() {}\ndiff --git a/test/lib_test.rs b/test/lib_test.rs\n+fn covered() {}\n";

struct DefaultConfig;

impl ConfigRepository for DefaultConfig {
    fn load(&self) -> Result<Config> {
        Ok(Config::default())
    }

    fn inspect_pretty_json(&self) -> Result<String> {
        Ok("{}".to_string())
    }
}

struct FakeSource {
    fail: bool,
}

#[async_trait]
impl PullRequestSource for FakeSource {
    async fn fetch_title(&self) -> Result<String, ReviewError> {
        if self.fail {
            return Err(ReviewError::ExternalCommand {
                command: "gh pr view".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "no such pull request".to_string(),
            });
        }
        Ok("Fix bug".to_string())
    }

    async fn fetch_body(&self) -> Result<String, ReviewError> {
        Ok("Fixes #1".to_string())
    }

    async fn fetch_diff(&self) -> Result<String, ReviewError> {
        Ok(DIFF.to_string())
    }
}

#[derive(Default)]
struct FakeSourceFactory {
    fail_title: bool,
    built: AtomicUsize,
    targets: Mutex<Vec<PullRequestTarget>>,
}

impl PullRequestSourceFactory for FakeSourceFactory {
    fn build(&self, target: &PullRequestTarget, _config: &Config) -> Box<dyn PullRequestSource> {
        self.built.fetch_add(1, Ordering::SeqCst);
        self.targets.lock().unwrap().push(target.clone());
        Box::new(FakeSource {
            fail: self.fail_title,
        })
    }
}

#[derive(Default)]
struct RecordingChat {
    silent: bool,
    /// 1부터 세는 호출 순번. 해당 호출만 빈 응답을 돌려준다.
    empty_call: Option<usize>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn send(&self, conversation: &mut Conversation) -> Result<String> {
        let prompt = conversation
            .last()
            .map(|message| message.content.clone())
            .unwrap_or_default();
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt);
        if self.silent || self.empty_call == Some(prompts.len()) {
            conversation.push_assistant("");
            return Ok(String::new());
        }
        let text = format!("response {}\n", prompts.len());
        conversation.push_assistant(text.clone());
        Ok(text)
    }
}

struct SharedChat(Arc<RecordingChat>);

#[async_trait]
impl ChatClient for SharedChat {
    async fn send(&self, conversation: &mut Conversation) -> Result<String> {
        self.0.send(conversation).await
    }
}

struct RecordingChatFactory {
    chat: Arc<RecordingChat>,
}

impl ChatClientFactory for RecordingChatFactory {
    fn build(&self, _config: &Config) -> Result<Box<dyn ChatClient>> {
        Ok(Box::new(SharedChat(Arc::clone(&self.chat))))
    }
}

#[derive(Default)]
struct SilentReporter {
    statuses: Mutex<Vec<String>>,
}

impl Reporter for SilentReporter {
    fn section(&self, _name: &str) {}
    fn kv(&self, _key: &str, _value: &str) {}
    fn status(&self, scope: &str, message: &str) {
        self.statuses
            .lock()
            .unwrap()
            .push(format!("{scope}: {message}"));
    }
    fn raw(&self, _line: &str) {}
}

struct Harness {
    sources: FakeSourceFactory,
    chat: Arc<RecordingChat>,
    reporter: SilentReporter,
}

impl Harness {
    fn new(silent: bool, fail_title: bool) -> Self {
        Self {
            sources: FakeSourceFactory {
                fail_title,
                ..Default::default()
            },
            chat: Arc::new(RecordingChat {
                silent,
                ..Default::default()
            }),
            reporter: SilentReporter::default(),
        }
    }

    fn with_empty_call(call: usize) -> Self {
        let mut harness = Self::new(false, false);
        harness.chat = Arc::new(RecordingChat {
            empty_call: Some(call),
            ..Default::default()
        });
        harness
    }

    async fn run(&self, url: &str, output_path: &str) -> Result<String> {
        let config_repo = DefaultConfig;
        let resolver = UrlTargetResolver;
        let chat_factory = RecordingChatFactory {
            chat: Arc::clone(&self.chat),
        };
        let writer = FileOutputWriter;
        let use_case = ReviewPrUseCase {
            config_repo: &config_repo,
            target_resolver: &resolver,
            source_factory: &self.sources,
            chat_factory: &chat_factory,
            output_writer: &writer,
            reporter: &self.reporter,
        };
        use_case
            .execute(RunOptions {
                url: url.to_string(),
                output_path: output_path.to_string(),
            })
            .await
    }
}

#[tokio::test]
async fn runs_five_stages_and_writes_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("review.md");
    std::fs::write(&output, "stale content").unwrap();
    let harness = Harness::new(false, false);

    let synthesis = harness
        .run(
            "https://github.com/acme/widgets/pull/42",
            output.to_str().unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(synthesis, "response 5\n");
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "response 5\n");

    let targets = harness.sources.targets.lock().unwrap();
    assert_eq!(targets[0].host, "github.com");
    assert_eq!(targets[0].repo, "acme/widgets");
    assert_eq!(targets[0].number, "42");

    let prompts = harness.chat.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 5);
    for prompt in prompts.iter() {
        assert!(prompt.contains("Title:\nFix bug"));
        assert!(prompt.contains("Body:\nFixes #1"));
        assert!(prompt.contains("src/lib.rs"));
        assert!(!prompt.contains("test/lib_test.rs"));
    }
    for earlier in ["response 1\n", "response 2\n", "response 3\n", "response 4\n"] {
        assert!(prompts[4].contains(earlier));
    }
    assert!(!prompts[3].contains("response 1"));
}

#[tokio::test]
async fn empty_responses_still_produce_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("review.md");
    std::fs::write(&output, "stale content").unwrap();
    let harness = Harness::new(true, false);

    let synthesis = harness
        .run(
            "https://github.com/acme/widgets/pull/7",
            output.to_str().unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(synthesis, "");
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
    assert_eq!(harness.chat.prompts.lock().unwrap().len(), 5);
    let statuses = harness.reporter.statuses.lock().unwrap();
    assert!(statuses.iter().any(|s| s.contains("5 stage(s) produced no content")));
}

#[tokio::test]
async fn one_empty_stage_does_not_stop_later_stages() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("review.md");
    let harness = Harness::with_empty_call(2);

    let synthesis = harness
        .run(
            "https://github.com/acme/widgets/pull/9",
            output.to_str().unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(synthesis, "response 5\n");
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "response 5\n");

    let prompts = harness.chat.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 5);
    assert!(prompts[4].contains("\nresponse 1\nresponse 3\nresponse 4\n\n\nTitle:\nFix bug"));
    assert!(!prompts[4].contains("response 2"));

    let statuses = harness.reporter.statuses.lock().unwrap();
    assert!(statuses.iter().any(|s| s.contains("1 stage(s) produced no content")));
}

#[tokio::test]
async fn failed_fetch_continues_with_empty_title() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("review.md");
    let harness = Harness::new(false, true);

    harness
        .run(
            "https://github.com/acme/widgets/pull/7",
            output.to_str().unwrap(),
        )
        .await
        .unwrap();

    let prompts = harness.chat.prompts.lock().unwrap();
    assert!(prompts[0].contains("Title:\n\n\nBody:\nFixes #1"));
    assert!(output.exists());
}

#[tokio::test]
async fn invalid_url_fails_before_fetching() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("review.md");
    let harness = Harness::new(false, false);

    let err = harness
        .run(
            "https://github.com/acme/widgets/issues/3",
            output.to_str().unwrap(),
        )
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("invalid pull request URL format"));
    assert_eq!(harness.sources.built.load(Ordering::SeqCst), 0);
    assert!(harness.chat.prompts.lock().unwrap().is_empty());
    assert!(!output.exists());
}
