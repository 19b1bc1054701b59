// Seeds the case catalog. Idempotent: existing titles are skipped.

use anyhow::{Context, Result};
use server_core::domains::cases::{Case, NewCase};
use server_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn catalog() -> Vec<NewCase> {
    vec![
        NewCase {
            title: "The Counterfeit Masterpiece".to_string(),
            description: "A gallery sold a painting attributed to a famous modernist for $2.4 \
                million. Six months later a forensic analysis suggested the canvas was primed \
                with a compound not manufactured until a decade after the artist's death. The \
                gallery owner is charged with fraud; she insists she relied in good faith on a \
                certificate of authenticity from a respected appraiser."
                .to_string(),
            prosecution_brief: "Show the owner knew or willfully ignored signs of forgery. She \
                commissioned the appraisal from a long-time business partner and declined an \
                independent second opinion requested by the buyer."
                .to_string(),
            defense_brief: "Establish good faith. The certificate was industry-standard, the \
                appraiser was credentialed, and the forensic method itself has a documented \
                error rate."
                .to_string(),
            evidences: vec![
                "Certificate of authenticity signed by the appraiser".to_string(),
                "Forensic pigment analysis report".to_string(),
                "Email thread declining the second opinion".to_string(),
                "Gallery's insurance filing valuing the work at $900,000".to_string(),
            ],
            witnesses: vec![
                "The appraiser".to_string(),
                "Forensic chemist".to_string(),
                "The buyer".to_string(),
                "Gallery's former assistant".to_string(),
            ],
        },
        NewCase {
            title: "The Midnight Data Leak".to_string(),
            description: "A systems administrator at a health-records company is accused of \
                exfiltrating 40,000 patient files, which later appeared for sale on a dark-web \
                forum. Access logs show his credentials were used at 2:13 AM from inside the \
                office network. He claims his credentials were stolen after a phishing incident \
                he reported two weeks earlier."
                .to_string(),
            prosecution_brief: "Tie the defendant to the terminal. Badge records place him in \
                the building that night and the files were staged in a directory only senior \
                administrators could reach."
                .to_string(),
            defense_brief: "The phishing report predates the breach and was never remediated. \
                Anyone with the stolen credentials and badge-cloning hardware could have done \
                this; the company's security practices are on trial, not the defendant."
                .to_string(),
            evidences: vec![
                "Access logs from the night of the breach".to_string(),
                "Badge reader records".to_string(),
                "The defendant's phishing incident ticket".to_string(),
                "Dark-web listing screenshots".to_string(),
            ],
            witnesses: vec![
                "Chief information security officer".to_string(),
                "Night-shift security guard".to_string(),
                "Independent forensics contractor".to_string(),
            ],
        },
        NewCase {
            title: "The Collapsed Footbridge".to_string(),
            description: "A pedestrian footbridge at a music festival collapsed, injuring \
                eleven people. The structural engineer who signed off on the temporary \
                installation is charged with criminal negligence. The load rating assumed \
                evenly distributed foot traffic; the collapse occurred while a crowd bounced \
                in rhythm to the headline act."
                .to_string(),
            prosecution_brief: "The engineer ignored the rhythmic-load addendum in the \
                applicable temporary-structures code and skipped the post-assembly inspection \
                to catch a flight."
                .to_string(),
            defense_brief: "The installation crew substituted undersized couplers after the \
                sign-off, a change the engineer was never told about and could not have \
                foreseen."
                .to_string(),
            evidences: vec![
                "Signed load-rating worksheet".to_string(),
                "Photographs of the recovered couplers".to_string(),
                "The installation crew's parts manifest".to_string(),
                "Boarding pass timestamps".to_string(),
            ],
            witnesses: vec![
                "Installation crew foreman".to_string(),
                "Festival safety coordinator".to_string(),
                "Independent structural engineer".to_string(),
                "An injured attendee".to_string(),
            ],
        },
        NewCase {
            title: "The Poisoned Vintage".to_string(),
            description: "At a charity wine auction, a collector died after tasting a rare \
                vintage laced with a restricted pesticide. The accused is a rival collector \
                who had bid against the victim for years and who donated the bottle in \
                question. He maintains the bottle was tampered with after donation, during \
                three days in the auction house's cellar."
                .to_string(),
            prosecution_brief: "The defendant purchased the same pesticide a month earlier \
                through a garden-supply account in his gardener's name, and the bottle's wax \
                seal was reapplied with a heat tool matching one found in his workshop."
                .to_string(),
            defense_brief: "Cellar access logs are incomplete, four staff members handled the \
                bottle, and the pesticide purchase is explained by a documented aphid \
                infestation in the defendant's vineyard."
                .to_string(),
            evidences: vec![
                "Toxicology report".to_string(),
                "Garden-supply purchase records".to_string(),
                "Cellar access log with a six-hour gap".to_string(),
                "Microscopy of the wax seal".to_string(),
            ],
            witnesses: vec![
                "Auction house cellar master".to_string(),
                "The defendant's gardener".to_string(),
                "Toxicologist".to_string(),
            ],
        },
        NewCase {
            title: "The Vanished Escrow".to_string(),
            description: "A real-estate escrow agent is accused of diverting $1.1 million of \
                client funds into a cryptocurrency exchange account opened under a shell \
                company. The agent says she was coerced: she produced threatening messages \
                from an anonymous number demanding the transfers and naming her daughter's \
                school."
                .to_string(),
            prosecution_brief: "The shell company was registered using the defendant's home IP \
                address three weeks before the first threatening message, and the messages \
                stopped the day auditors flagged the account."
                .to_string(),
            defense_brief: "Coercion does not require a stranger. The registration could be \
                the coercer's framing, and the defendant reported the threats to a lawyer \
                before any audit began."
                .to_string(),
            evidences: vec![
                "Shell company registration records".to_string(),
                "The threatening message transcripts".to_string(),
                "Exchange account transaction history".to_string(),
                "The lawyer's dated memo".to_string(),
            ],
            witnesses: vec![
                "Forensic accountant".to_string(),
                "The defendant's lawyer".to_string(),
                "Exchange compliance officer".to_string(),
            ],
        },
        NewCase {
            title: "The Understudy's Fall".to_string(),
            description: "During a theater production's aerial finale, a lead actor fell when \
                a rigging carabiner opened mid-performance. The understudy, who performed the \
                role to acclaim for the remaining run, is charged with sabotage. The carabiner \
                gate was found filed down; the understudy had rigging training from a circus \
                career and was alone in the fly loft that afternoon."
                .to_string(),
            prosecution_brief: "Opportunity, capability, and motive align: the understudy's \
                contract was ending that week, and metal filings were recovered from a pouch \
                in his dressing room."
                .to_string(),
            defense_brief: "The rigging head testified the carabiner batch had a known gate \
                defect recalled by the manufacturer, and the filings match the pouch's own \
                zipper repair, not the carabiner alloy."
                .to_string(),
            evidences: vec![
                "Manufacturer recall notice".to_string(),
                "Metallurgical comparison of the filings".to_string(),
                "Fly loft sign-in sheet".to_string(),
                "The understudy's expiring contract".to_string(),
            ],
            witnesses: vec![
                "Head of rigging".to_string(),
                "Stage manager".to_string(),
                "Metallurgist".to_string(),
                "The injured actor".to_string(),
            ],
        },
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let mut inserted = 0;
    for case in catalog() {
        let title = case.title.clone();
        if Case::insert_if_missing(&case, &pool).await? {
            tracing::info!(%title, "seeded case");
            inserted += 1;
        } else {
            tracing::info!(%title, "case already present, skipping");
        }
    }

    tracing::info!(inserted, "case seeding complete");
    Ok(())
}
