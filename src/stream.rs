use crate::decoder::{Result, TextDecoder};
use futures_core::{ready, Stream};
use futures_io::AsyncRead;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

const DEFAULT_BUF_SIZE: usize = 8 * 1024;

pin_project! {
    /// Adapts an [`AsyncRead`] into a stream of decoded text chunks.
    ///
    /// Each read is fed through a [`TextDecoder`] in streaming mode, so
    /// multi-byte sequences split across reads come out whole. On EOF the
    /// decoder is finalized and the stream ends.
    pub struct DecodeStream<R> {
        #[pin]
        reader: R,
        decoder: TextDecoder,
        buf: Box<[u8]>,
        eof: bool,
    }
}

impl<R> DecodeStream<R> {
    /// UTF-8 decoding stream with the default buffer size.
    pub fn new(reader: R) -> Self {
        DecodeStream::with_decoder(TextDecoder::new(), reader)
    }

    pub fn with_decoder(decoder: TextDecoder, reader: R) -> Self {
        DecodeStream::with_capacity(DEFAULT_BUF_SIZE, decoder, reader)
    }

    pub fn with_capacity(capacity: usize, decoder: TextDecoder, reader: R) -> Self {
        Self {
            reader,
            decoder,
            buf: vec![0; capacity].into_boxed_slice(),
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R> Stream for DecodeStream<R>
where
    R: AsyncRead + Unpin,
{
    type Item = Result<String>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<<Self as Stream>::Item>> {
        let this = self.project();
        if *this.eof {
            return Poll::Ready(None);
        }
        let n = match ready!(this.reader.poll_read(cx, this.buf)) {
            Ok(n) => n,
            Err(err) => return Poll::Ready(Some(Err(err.into()))),
        };
        if n == 0 {
            *this.eof = true;
            // flush whatever the decoder still carries
            return match this.decoder.finish() {
                Ok(tail) if tail.is_empty() => Poll::Ready(None),
                Ok(tail) => Poll::Ready(Some(Ok(tail))),
                Err(err) => Poll::Ready(Some(Err(err))),
            };
        }
        Poll::Ready(Some(this.decoder.decode_stream(&this.buf[..n])))
    }
}
