pub mod core;
pub mod compression;
pub mod corpus;
pub mod dump;
pub mod index;
pub mod gap;
pub mod batch;
pub mod emit;
pub mod parallel;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                            LEXIGAP DATA FLOW                                 │
└──────────────────────────────────────────────────────────────────────────────┘

  queries/**/*.sparql                         latest-lexemes.json.{gz,zst,lz4,sz}
          │                                                 │
          ▼                                                 ▼
 ┌──────────────────────┐                     ┌───────────────────────────────┐
 │ corpus::QueryMiner   │                     │ dump::DumpScanner             │
 │  ClauseMatcher       │                     │  compression::open_decoder    │
 │  - dct:language      │                     │  RecordStream (pull, 1 line)  │
 │  - lexicalCategory   │                     │  ScanFilter (lang/cat/forms)  │
 │  - OPTIONAL {...}    │                     └───────────────┬───────────────┘
 └──────────┬───────────┘                                     │ LexemeRecord
            │                                                 ▼
            │                                 ┌───────────────────────────────┐
            │                                 │ index::FeatureExtractor       │
            │                                 │  form → FeatureCombination    │
            │                                 └───────────────┬───────────────┘
            ▼                                                 ▼
 ┌──────────────────────┐                     ┌───────────────────────────────┐
 │ CoverageIndex        │                     │ ObservedIndex                 │
 │ key → {combination}  │                     │ key → {combination}           │
 └──────────┬───────────┘                     │ (parallel::ShardScanner       │
            │                                 │  merges shards by union)      │
            │                                 └───────────────┬───────────────┘
            └──────────────────────┬──────────────────────────┘
                                   ▼
                  ┌─────────────────────────────────┐
                  │ gap::GapResolver                │
                  │  observed − covered per key     │
                  │  FeaturePositionTable ordering  │
                  └────────────────┬────────────────┘
                                   ▼ GapReport
                  ┌─────────────────────────────────┐
                  │ batch::BatchPacker (cap N = 6)  │
                  │  group by 1st id, split by 2nd, │
                  │  first-fit by ascending size    │
                  └────────────────┬────────────────┘
                                   ▼ Batch
                  ┌─────────────────────────────────┐
                  │ emit::QueryEmitter              │
                  │  SparqlEmitter → *.sparql       │
                  └─────────────────────────────────┘

 core::pipeline::Pipeline wires the stages; core::{config, error, stats, types}
 are shared by all of them.
*/
