//! The four stage processors.
//!
//! Each stage enumerates local inputs of one class, derives the UUID,
//! computes the expected output, skips work whose output already exists, and
//! otherwise invokes exactly one external capability per artifact. Whether
//! "already exists" means the local file or also the remote object differs
//! per stage and is modeled explicitly by [`OutputCheck`]: the synthesis
//! capability writes its result straight to the bucket, so those stages gate
//! on remote existence too.

use crate::artifact::{self, ArtifactClass};
use crate::context::Context;
use crate::defaults;
use crate::error::Result;
use crate::speech::synthesizer::VoiceSpec;
use std::path::PathBuf;

/// Where a stage's memoization check looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCheck {
    /// Skip when the local output file exists.
    Local,
    /// Skip when the local output file exists, or the remote output object
    /// does.
    LocalAndRemote,
}

/// One artifact a stage still has to process.
struct Pending {
    uuid: String,
    input_path: PathBuf,
    output_path: PathBuf,
}

/// Enumerate inputs whose local output does not exist yet.
///
/// The local half of the memoization check happens here, before the input is
/// ever read, so a satisfied artifact costs nothing.
fn pending_outputs(
    ctx: &Context,
    input: ArtifactClass,
    output: ArtifactClass,
) -> Result<Vec<Pending>> {
    let mut pending = Vec::new();
    for item in artifact::list_local(ctx.root(), input)? {
        let output_path = output.local_path(ctx.root(), &item.uuid);
        if output_path.exists() {
            continue;
        }
        pending.push(Pending {
            input_path: input.local_path(ctx.root(), &item.uuid),
            output_path,
            uuid: item.uuid,
        });
    }
    Ok(pending)
}

/// Remote half of the memoization check, for stages that need it.
async fn remotely_satisfied(ctx: &Context, check: OutputCheck, object: &str) -> Result<bool> {
    match check {
        OutputCheck::Local => Ok(false),
        OutputCheck::LocalAndRemote => ctx.store.exists(object).await,
    }
}

/// Transcribe raw audio into text prompts.
///
/// The input is transcoded to mono FLAC in a scratch directory, then sent to
/// recognition with a fixed language hint. Zero recognition results are a
/// valid outcome (a silent clip) and produce the placeholder transcript.
pub async fn transcribe(ctx: &Context) -> Result<usize> {
    artifact::ensure_dirs(ctx.root())?;
    let timeout = ctx.config().pipeline.recognize_timeout();

    let mut produced = 0;
    for item in pending_outputs(ctx, ArtifactClass::RawAudio, ArtifactClass::Transcript)? {
        tracing::info!(uuid = %item.uuid, "transcribing");
        let scratch = tempfile::tempdir()?;
        let flac_path = scratch.path().join("audio.flac");
        ctx.transcoder
            .transcode_to_flac(&item.input_path, &flac_path)?;
        let audio = std::fs::read(&flac_path)?;

        let transcript = ctx
            .recognizer
            .recognize(&audio, defaults::RECOGNITION_LANGUAGE, timeout)
            .await?;
        let text =
            transcript.unwrap_or_else(|| defaults::EMPTY_TRANSCRIPT_PLACEHOLDER.to_string());

        std::fs::write(&item.output_path, text)?;
        produced += 1;
    }
    Ok(produced)
}

/// The fixed instruction template wrapped around each transcript.
fn podcast_prompt(transcript: &str) -> String {
    format!(
        "Create a transcript for the podcast about cheese with {words} or more words.\n\
         Use the below text as a starting point for the cheese podcast.\n\
         Output the transcript as paragraphs and not with who is talking or any \"Sound\" or any other extra information.\n\
         Do not highlight or make words bold.\n\
         The host's name is {host}.\n\
         {transcript}",
        words = defaults::GENERATION_TARGET_WORDS,
        host = defaults::PODCAST_HOST,
    )
}

/// Generate long-form paragraphs from transcripts.
pub async fn generate(ctx: &Context) -> Result<usize> {
    artifact::ensure_dirs(ctx.root())?;

    let mut produced = 0;
    for item in pending_outputs(ctx, ArtifactClass::Transcript, ArtifactClass::Paragraph)? {
        tracing::info!(uuid = %item.uuid, "generating");
        let transcript = std::fs::read_to_string(&item.input_path)?;
        let paragraph = ctx.generator.generate(&podcast_prompt(&transcript)).await?;
        std::fs::write(&item.output_path, paragraph)?;
        produced += 1;
    }
    Ok(produced)
}

/// The two synthesis stages, differing only in input class and voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisTarget {
    English,
    French,
}

impl SynthesisTarget {
    fn input_class(self) -> ArtifactClass {
        match self {
            SynthesisTarget::English => ArtifactClass::Paragraph,
            SynthesisTarget::French => ArtifactClass::TranslatedText,
        }
    }

    fn output_class(self) -> ArtifactClass {
        match self {
            SynthesisTarget::English => ArtifactClass::EnglishAudio,
            SynthesisTarget::French => ArtifactClass::FrenchAudio,
        }
    }

    fn voice(self) -> VoiceSpec {
        match self {
            SynthesisTarget::English => VoiceSpec {
                language_code: defaults::EN_VOICE_LANGUAGE,
                name: defaults::EN_VOICE_NAME,
            },
            SynthesisTarget::French => VoiceSpec {
                language_code: defaults::FR_VOICE_LANGUAGE,
                name: defaults::FR_VOICE_NAME,
            },
        }
    }
}

/// Synthesize speech for every paragraph (or translation) whose audio does
/// not exist yet.
///
/// The synthesis service writes the audio directly to the bucket, so the
/// memoization check extends to the remote object; nothing is written
/// locally.
pub async fn synthesize(ctx: &Context, target: SynthesisTarget) -> Result<usize> {
    artifact::ensure_dirs(ctx.root())?;
    let check = OutputCheck::LocalAndRemote;
    let timeout = ctx.config().pipeline.synthesize_timeout();
    let voice = target.voice();

    let mut produced = 0;
    for item in pending_outputs(ctx, target.input_class(), target.output_class())? {
        let object = target.output_class().object_name(&item.uuid);
        if remotely_satisfied(ctx, check, &object).await? {
            tracing::debug!(object = %object, "already in bucket, skipping");
            continue;
        }

        let text = std::fs::read_to_string(&item.input_path)?;
        let output_uri = format!("gs://{}/{}", ctx.config().gcp.bucket, object);
        tracing::info!(object = %object, "synthesizing");
        ctx.synthesizer
            .synthesize_to_object(&text, &voice, &output_uri, timeout)
            .await?;
        produced += 1;
    }
    Ok(produced)
}

/// Translate paragraphs from English to French.
pub async fn translate(ctx: &Context) -> Result<usize> {
    artifact::ensure_dirs(ctx.root())?;

    let mut produced = 0;
    for item in pending_outputs(ctx, ArtifactClass::Paragraph, ArtifactClass::TranslatedText)? {
        tracing::info!(uuid = %item.uuid, "translating");
        let text = std::fs::read_to_string(&item.input_path)?;
        let translated = ctx
            .translator
            .translate(
                &text,
                defaults::TRANSLATION_SOURCE,
                defaults::TRANSLATION_TARGET,
            )
            .await?;
        std::fs::write(&item.output_path, translated)?;
        produced += 1;
    }
    Ok(produced)
}
