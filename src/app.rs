//! Pipeline driver: runs the requested operations in canonical order.

use crate::artifact::ArtifactClass;
use crate::cli::Cli;
use crate::context::Context;
use crate::error::Result;
use crate::pipeline::{SynthesisTarget, fetch, generate, publish, synthesize, transcribe, translate};

/// Run every operation selected on the command line.
///
/// Operations always execute in the fixed pipeline order below, regardless
/// of the order the flags were supplied, because later stages assume earlier
/// stages' directories are populated. No stage triggers another; sequencing
/// across separate invocations is the caller's responsibility.
pub async fn run_pipeline(cli: &Cli, ctx: &Context) -> Result<()> {
    if cli.download_audio {
        let count = fetch(ctx, ArtifactClass::RawAudio).await?;
        tracing::info!(count, "downloaded raw audio");
    }
    if cli.transcribe {
        let count = transcribe(ctx).await?;
        tracing::info!(count, "transcribed audio");
    }
    if cli.upload_transcripts {
        let count = publish(ctx, ArtifactClass::Transcript).await?;
        tracing::info!(count, "uploaded transcripts");
    }
    if cli.download_prompts {
        let count = fetch(ctx, ArtifactClass::Transcript).await?;
        tracing::info!(count, "downloaded transcripts");
    }
    if cli.generate {
        let count = generate(ctx).await?;
        tracing::info!(count, "generated paragraphs");
    }
    if cli.upload_paragraphs {
        let count = publish(ctx, ArtifactClass::Paragraph).await?;
        tracing::info!(count, "uploaded paragraphs");
    }
    if cli.download_paragraphs {
        let count = fetch(ctx, ArtifactClass::Paragraph).await?;
        tracing::info!(count, "downloaded paragraphs");
    }
    if cli.synthesize_en {
        let count = synthesize(ctx, SynthesisTarget::English).await?;
        tracing::info!(count, "synthesized English audio");
    }
    if cli.translate {
        let count = translate(ctx).await?;
        tracing::info!(count, "translated paragraphs");
    }
    if cli.upload_translations {
        let count = publish(ctx, ArtifactClass::TranslatedText).await?;
        tracing::info!(count, "uploaded translations");
    }
    if cli.download_translations {
        let count = fetch(ctx, ArtifactClass::TranslatedText).await?;
        tracing::info!(count, "downloaded translations");
    }
    if cli.synthesize_fr {
        let count = synthesize(ctx, SynthesisTarget::French).await?;
        tracing::info!(count, "synthesized French audio");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::speech::recognizer::MockRecognizer;
    use crate::speech::synthesizer::MockSynthesizer;
    use crate::storage::MemoryStore;
    use crate::text::generator::MockGenerator;
    use crate::text::translator::MockTranslator;
    use crate::transcode::MockTranscoder;
    use clap::Parser;
    use std::path::Path;
    use std::sync::Arc;

    fn test_context(store: Arc<MemoryStore>, root: &Path) -> Context {
        let mut config = Config::default();
        config.gcp.bucket = "test-bucket".to_string();
        config.pipeline.workspace = root.to_path_buf();
        Context::new(
            config,
            store,
            Arc::new(MockRecognizer::new()),
            Arc::new(MockGenerator::new()),
            Arc::new(MockTranslator::new()),
            Arc::new(MockSynthesizer::new()),
            Arc::new(MockTranscoder::new()),
        )
    }

    #[tokio::test]
    async fn test_no_flags_performs_no_work() {
        let store = Arc::new(MemoryStore::new());
        store.put("input_audios/input-1.mp3", b"audio");

        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(store, tmp.path());
        let cli = Cli::try_parse_from(["polyvox"]).unwrap();

        run_pipeline(&cli, &ctx).await.unwrap();
        // Nothing fetched, nothing staged
        assert!(!tmp.path().join("input_audios/input-1.mp3").exists());
    }

    #[tokio::test]
    async fn test_flags_run_in_canonical_order() {
        // Transcription listed before download on the command line must
        // still see the downloaded audio.
        let store = Arc::new(MemoryStore::new());
        store.put("input_audios/input-1.mp3", b"audio");

        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(store, tmp.path());
        let cli = Cli::try_parse_from(["polyvox", "--transcribe", "--download-audio"]).unwrap();

        run_pipeline(&cli, &ctx).await.unwrap();
        assert!(
            tmp.path()
                .join("text_prompts/input-1.txt")
                .exists()
        );
    }
}
