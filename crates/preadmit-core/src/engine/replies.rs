//! Authored reply texts that do not live in the knowledge base.

use crate::shared::StateLabel;

pub const EMPTY: &str =
    "I didn't receive any message. How can I help you with the pre-admission process?";

pub const OFF_TOPIC: &str = "I'm sorry, I can only assist with pre-admission related queries. Please ask me about the application process, health form, interview schedules, status checking, reports, or any other pre-admission procedures.";

pub const GREETING: &str = "Hello! How can I help you with the pre-admission process today? You can ask me about application forms, health forms, interview schedules, status checking, or any step in the admission process.";

pub const GRATITUDE: &str = "You're welcome! Feel free to ask if you have any other questions about pre-admission. I'm here to help!";

pub const FAREWELL: &str =
    "Goodbye! Best of luck with your admission process. Feel free to return if you have more questions!";

/// The five example completion phrases offered when the stage is unknown.
pub const EXAMPLE_COMPLETIONS: [&str; 5] = [
    "I filled the application form",
    "I completed the health form",
    "I registered my details",
    "I attended the interview",
    "I got my test marks",
];

pub fn clarify_stage() -> String {
    let examples: Vec<String> = EXAMPLE_COMPLETIONS
        .iter()
        .map(|phrase| format!("• \"{phrase}\""))
        .collect();
    format!(
        "To guide you on the next steps, could you tell me which stage you're at?\n\nPlease say something like:\n{}\n\nWhat did you last complete?",
        examples.join("\n")
    )
}

pub const HELP: &str = r#"I can help you with:

• **Application Form** - How to fill student and parent details
• **Health Form** - What medical information is needed
• **Registration** - How to verify your details
• **Interview Schedule** - Oral and Written test dates
• **Marks Entry** - Where to check test scores
• **Status Tracking** - Application and Admission status
• **Complete Process** - Full step-by-step guide
• **Reports** - Available reports and downloads
• **Fees** - Payment information

What would you like to know about? Or tell me what stage you've completed!"#;

pub const SELECTION_RESULT: &str = r#"After completing your Oral and Written Tests, check the following to see if your ward got selected:

**1. Marks Entry Section**
• Go to "Marks Entry" page
• View Oral Test Entry - Your interview scores
• View Written Test Entry - Your exam marks

**2. Preadmission Status → Admission Status**
This is where you'll see the SELECTION RESULT:
• **In Progress** - Tests are being evaluated
• **Selected** - Congratulations! Your ward is SELECTED!
• **Rejected** - Not selected this time
• **Confirmed** - Final admission confirmed

The **Admission Status** clearly shows if your ward got selected. Keep checking it after completing the interviews!

Would you like to know what happens after getting selected?"#;

pub const LOCATE_HEALTH_FORM: &str =
    "The Health Form appears on the **right side** after you submit the Application Form. It's mandatory!";

pub const LOCATE_MARKS: &str =
    "Check your marks in the **Marks Entry** section - it has both Oral Test Entry and Written Test Entry.";

pub const LOCATE_STATUS: &str =
    "Track your progress in **Preadmission Status** page. It shows both Application Status and Admission Status.";

pub const LOCATE_INTERVIEW: &str =
    "Your interview details are in the **Interview Schedule** section with Oral and Written test schedules.";

const AFTER_APPLICATION_FORM: &str = r#"Perfect! Since you've filled the Application Form, the **next mandatory step** is:

**Fill the Health Form**

The Health Form appears on the right side after submitting the Application Form. You need to provide:
• Any chronic diseases or health conditions
• Preferred hospital or clinic for emergencies
• Emergency contact number
• Accept the health declaration (mandatory checkbox)

After completing the Health Form, you can verify all details in the **Registration Page**.

Need help with the Health Form?"#;

const AFTER_HEALTH_FORM: &str = r#"Great! After completing the Health Form, here's what comes next:

**Step 1: Verify Your Details**
Go to the **Registration Page** to review all information you've entered

**Step 2: Wait for Interview Schedule**
The school will review your application (typically 3-5 days) and assign:
• Oral Test (Interview) - date, time, venue
• Written Test - date, time, venue

**Step 3: Check Interview Schedule Section**
Regularly monitor this section for your test dates

**Step 4: Prepare Documents**
Keep all original documents ready for verification

Would you like to know what to expect in the interviews?"#;

const AFTER_REGISTRATION: &str = r#"Since you've completed registration, your next steps are:

**1. Monitor Interview Schedule**
Check the "Interview Schedule" section regularly for:
• Oral Test Schedule (your interview date/time/venue)
• Written Test Schedule (your exam date/time/venue)

**2. Prepare for Tests**
• Oral Test: Be ready to discuss yourself, academics, interests
• Written Test: Study according to the class you're applying for

**3. Keep Documents Ready**
Original documents may be verified during the oral interview

The school typically assigns interview dates within 5-7 working days.

Need tips for interview preparation?"#;

const AFTER_INTERVIEW: &str = r#"Excellent! You've completed the tests. Here's what happens next:

**Immediate Next Steps:**

1. **Check Marks Entry (2-3 days)**
   • Oral Test Entry - Your interview scores
   • Written Test Entry - Your exam marks

2. **Monitor Application Status (5-7 days)**
   Go to **Preadmission Status** → **Application Status**
   • Waiting → Under review
   • Accepted → You move to next stage
   • Rejected → Not accepted (reasons provided)

3. **Once Accepted → Check Admission Status**
   • In Progress → Being evaluated
   • Selected → You're IN!
   • Confirmed → Final admission confirmed

Keep checking daily for updates!"#;

const AFTER_MARKS: &str = r#"Good! Now that you have your test marks, here's what to do:

**Monitor Your Application Status:**
Go to **Preadmission Status** page and check:

**1. Application Status Section:**
• Waiting - Under review by admission committee
• Accepted - Move to next stage
• Rejected - Not selected (reasons provided)

**2. Once Accepted → Admission Status Section:**
• In Progress - Being evaluated
• Selected - Congratulations! You're selected
• Confirmed - Final admission confirmed

**3. After Confirmation:**
• You'll appear in Transfer Student section
• Complete any remaining formalities

Check the status daily for updates!"#;

/// What to do after completing `state`.
pub fn next_step(state: StateLabel) -> &'static str {
    match state {
        StateLabel::ApplicationForm => AFTER_APPLICATION_FORM,
        StateLabel::HealthForm => AFTER_HEALTH_FORM,
        StateLabel::Registration => AFTER_REGISTRATION,
        StateLabel::InterviewCompleted => AFTER_INTERVIEW,
        StateLabel::MarksReceived => AFTER_MARKS,
    }
}
